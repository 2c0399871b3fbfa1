pub mod catalog;
pub mod config;
pub mod error;
pub mod spy;
pub mod toc;

pub use config::Config;
pub use error::ConfigError;
