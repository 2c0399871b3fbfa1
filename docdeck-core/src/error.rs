//! Error types for docdeck-core.
use thiserror::Error;

/// Errors raised by the page bindings and collaborators.
///
/// Missing page regions are not errors: the dependent feature is skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
  #[error("Invalid CSS selector: '{0}'")]
  Selector(String),

  #[error("Clipboard write failed: {0}")]
  Clipboard(String),

  #[error("Unknown share provider: '{0}'")]
  UnknownProvider(String),
}

/// Result type for docdeck-core operations.
pub type CoreResult<T> = Result<T, CoreError>;
