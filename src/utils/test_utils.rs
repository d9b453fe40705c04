use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

use crate::api::{
    ChatCompleter, ImageGenerator, ImageSource, ModelInfo, ModelLister, ProviderError,
};
use crate::core::app::App;
use crate::core::config::{Config, ConfigStore};
use crate::core::dispatch::Collaborators;
use crate::core::message::Turn;

pub const FAKE_IMAGE_URL: &str = "https://images.test/generated.png";

#[derive(Debug, Clone)]
pub struct ChatCall {
    pub api_key: String,
    pub model: String,
    pub turns: Vec<Turn>,
    pub temperature: f32,
}

#[derive(Default)]
struct Recorded {
    chat_calls: Vec<ChatCall>,
    image_prompts: Vec<String>,
    fetched_urls: Vec<String>,
    model_listings: usize,
}

/// In-memory stand-in for every remote collaborator.
#[derive(Clone, Default)]
pub struct FakeProvider {
    reply: Option<Result<String, ProviderError>>,
    image: Option<Vec<u8>>,
    models: Vec<ModelInfo>,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(Ok(text.to_string())),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Some(Err(ProviderError::new(message))),
            ..Self::default()
        }
    }

    pub fn with_image(bytes: Vec<u8>) -> Self {
        Self {
            image: Some(bytes),
            ..Self::default()
        }
    }

    pub fn with_models(ids: &[(&str, Option<u64>)]) -> Self {
        Self {
            models: ids
                .iter()
                .map(|(id, created)| ModelInfo {
                    id: id.to_string(),
                    created: *created,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::shared(self.clone())
    }

    pub fn chat_calls(&self) -> Vec<ChatCall> {
        self.recorded.lock().unwrap().chat_calls.clone()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.recorded.lock().unwrap().image_prompts.clone()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.recorded.lock().unwrap().fetched_urls.clone()
    }

    pub fn model_listings(&self) -> usize {
        self.recorded.lock().unwrap().model_listings
    }
}

#[async_trait]
impl ChatCompleter for FakeProvider {
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        turns: &[Turn],
        temperature: f32,
    ) -> Result<String, ProviderError> {
        self.recorded.lock().unwrap().chat_calls.push(ChatCall {
            api_key: api_key.to_string(),
            model: model.to_string(),
            turns: turns.to_vec(),
            temperature,
        });
        self.reply
            .clone()
            .unwrap_or_else(|| Err(ProviderError::new("no chat reply configured")))
    }
}

#[async_trait]
impl ImageGenerator for FakeProvider {
    async fn generate(
        &self,
        _api_key: &str,
        prompt: &str,
        _count: u32,
        _size: &str,
    ) -> Result<ImageSource, ProviderError> {
        self.recorded
            .lock()
            .unwrap()
            .image_prompts
            .push(prompt.to_string());
        if let Some(Err(err)) = &self.reply {
            return Err(err.clone());
        }
        Ok(ImageSource::Url(FAKE_IMAGE_URL.to_string()))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.recorded
            .lock()
            .unwrap()
            .fetched_urls
            .push(url.to_string());
        self.image
            .clone()
            .ok_or_else(|| ProviderError::new("no image configured"))
    }
}

#[async_trait]
impl ModelLister for FakeProvider {
    async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>, ProviderError> {
        self.recorded.lock().unwrap().model_listings += 1;
        if let Some(Err(err)) = &self.reply {
            return Err(err.clone());
        }
        Ok(self
            .models
            .iter()
            .map(|model| ModelInfo {
                id: model.id.clone(),
                created: model.created,
            })
            .collect())
    }
}

/// Encode a solid grayscale PNG.
pub fn png_bytes(width: u32, height: u32, level: u8) -> Vec<u8> {
    let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([level])));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

pub fn config_with_key() -> Config {
    Config {
        api_key: Some("sk-test".to_string()),
        ..Config::default()
    }
}

/// An app with one empty tab whose config lives at a path nothing writes to
/// unless a test persists explicitly.
pub fn create_test_app(config: Config) -> App {
    let store = ConfigStore::new(
        PathBuf::from("/nonexistent/chatlpt_config.json"),
        config,
        None,
        None,
    );
    App::new(store)
}
