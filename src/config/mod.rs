//! Configuration file (`config.toml`) and its defaults.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, RenderConfig, SourceConfig, ViewConfig};
