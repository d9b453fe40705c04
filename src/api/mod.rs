//! Wire payloads and collaborator seams for the remote chat API.

pub mod client;
pub mod models;

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::message::Turn;

pub use client::OpenAiClient;

pub const IMAGE_SIZE: &str = "512x512";

#[derive(Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
    pub temperature: f32,
}

#[derive(Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Serialize)]
pub struct ImageGenerationRequest<'a> {
    pub prompt: &'a str,
    pub n: u32,
    pub size: &'a str,
}

#[derive(Deserialize)]
pub struct ImageData {
    pub url: Option<String>,
    pub b64_json: Option<String>,
}

#[derive(Deserialize)]
pub struct ImageGenerationResponse {
    pub data: Vec<ImageData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub created: Option<u64>,
}

#[derive(Deserialize)]
pub struct ModelsResponse {
    pub data: Vec<ModelInfo>,
}

/// Where a generated image can be obtained from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    Inline(Vec<u8>),
}

/// A failure reported by (or while talking to) the remote provider.
///
/// The message is already human readable; it is what ends up after
/// `Error: ` in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::new(err.to_string())
    }
}

#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Send the whole conversation and return the assistant's reply text.
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        turns: &[Turn],
        temperature: f32,
    ) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        count: u32,
        size: &str,
    ) -> Result<ImageSource, ProviderError>;

    /// Download raw image bytes from a generation result URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

#[async_trait]
pub trait ModelLister: Send + Sync {
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, ProviderError>;
}
