use std::io;

use docdeck_config::ConfigError;
use docdeck_core::CoreError;
use thiserror::Error;

/// Top-level error type for the docdeck commands.
#[derive(Debug, Error)]
pub enum DocdeckError {
  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Page error: {0}")]
  Core(#[from] CoreError),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Invalid layout: {0}")]
  Layout(#[from] serde_json::Error),
}
