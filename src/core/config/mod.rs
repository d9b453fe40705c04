pub mod data;
pub mod io;
pub mod store;


pub use data::{Config, ImageDisplayMode};
pub use io::ConfigError;
pub use store::ConfigStore;
