//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::boolean::default_scaling_handler;
use super::handlers::{
    ApiKeyHandler, FontFamilyHandler, FontSizeHandler, ImageDisplayHandler, ModelHandler,
};
use super::SettingHandler;

pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `chatlpt set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(ApiKeyHandler));
        registry.register(Box::new(ModelHandler));
        registry.register(Box::new(ImageDisplayHandler));
        registry.register(Box::new(FontFamilyHandler));
        registry.register(Box::new(FontSizeHandler));
        registry.register(Box::new(default_scaling_handler()));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// All keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
