use async_trait::async_trait;
use base64::Engine;
use reqwest::{RequestBuilder, Response};

use super::{
    ChatCompleter, ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest,
    ImageGenerationResponse, ImageGenerator, ImageSource, ModelInfo, ModelLister, ModelsResponse,
    ProviderError,
};
use crate::core::message::Turn;
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// HTTP implementation of the chat, image and model-listing collaborators
/// for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Build a client for `OPENAI_BASE_URL`, or the public endpoint.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(reqwest::Client::new(), base_url)
    }

    fn authorized(&self, request: RequestBuilder, api_key: &str) -> RequestBuilder {
        request
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {api_key}"))
    }
}

/// Turn a non-success response into a provider error, preferring the
/// provider's own `error.message` text.
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(ProviderError::new(format_api_error(status.as_u16(), &body)))
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

pub fn format_api_error(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value) {
            return summary;
        }
    }
    if trimmed.is_empty() {
        format!("API request failed with status {status}")
    } else {
        format!("API request failed with status {status}: {trimmed}")
    }
}

#[async_trait]
impl ChatCompleter for OpenAiClient {
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        turns: &[Turn],
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model,
            messages: turns,
            temperature,
        };
        let url = construct_api_url(&self.base_url, "chat/completions");
        tracing::debug!(%url, model, turns = turns.len(), "sending chat completion");

        let response = self
            .authorized(self.http.post(url), api_key)
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: ChatCompletionResponse = response.json().await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ProviderError::new("Response contained no message content"))
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        count: u32,
        size: &str,
    ) -> Result<ImageSource, ProviderError> {
        let request = ImageGenerationRequest {
            prompt,
            n: count,
            size,
        };
        let url = construct_api_url(&self.base_url, "images/generations");
        tracing::debug!(%url, size, "requesting image generation");

        let response = self
            .authorized(self.http.post(url), api_key)
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: ImageGenerationResponse = response.json().await?;

        let image = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new("Response contained no image"))?;
        match (image.url, image.b64_json) {
            (Some(url), _) => Ok(ImageSource::Url(url)),
            (None, Some(encoded)) => base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map(ImageSource::Inline)
                .map_err(|err| ProviderError::new(format!("Invalid inline image data: {err}"))),
            (None, None) => Err(ProviderError::new("Response contained no image")),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ModelLister for OpenAiClient {
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, ProviderError> {
        let url = construct_api_url(&self.base_url, "models");
        let response = self
            .authorized(self.http.get(url), api_key)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: ModelsResponse = response.json().await?;
        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_are_summarized() {
        let body = r#"{"error":{"message":"Rate limit   reached\nfor requests","type":"requests"}}"#;
        assert_eq!(format_api_error(429, body), "Rate limit reached for requests");
    }

    #[test]
    fn string_error_fields_are_used() {
        assert_eq!(format_api_error(400, r#"{"error":"bad input"}"#), "bad input");
        assert_eq!(format_api_error(500, r#"{"message":"oops"}"#), "oops");
    }

    #[test]
    fn plain_bodies_include_status() {
        assert_eq!(
            format_api_error(502, "upstream unavailable"),
            "API request failed with status 502: upstream unavailable"
        );
        assert_eq!(
            format_api_error(401, "  "),
            "API request failed with status 401"
        );
    }

    #[test]
    fn json_without_summary_falls_back_to_body() {
        assert_eq!(
            format_api_error(500, r#"{"status":"failed"}"#),
            r#"API request failed with status 500: {"status":"failed"}"#
        );
    }

    #[test]
    fn chat_request_serializes_turns_and_temperature() {
        let turns = vec![Turn::system("sys"), Turn::user("hi")];
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &turns,
            temperature: 0.8,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert!((value["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn image_request_asks_for_one_square_image() {
        let request = ImageGenerationRequest {
            prompt: "a red cube",
            n: 1,
            size: crate::api::IMAGE_SIZE,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"prompt": "a red cube", "n": 1, "size": "512x512"})
        );
    }
}
