pub mod app;
pub mod ascii_art;
pub mod buffer;
pub mod chat_file;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod message;
pub mod render;
pub mod session;
pub mod text_wrapping;
pub mod transcript;
