//! Clipboard capability and copy-button feedback.
use docdeck_config::toc::TocConfig;
use log::{debug, error};

use crate::error::{CoreError, CoreResult};

/// Message shown when copying a page link fails.
pub const COPY_LINK_FAILED: &str = "Failed to copy link";

/// Host clipboard.
pub trait Clipboard {
  /// Replace the clipboard contents with `text`.
  ///
  /// # Errors
  ///
  /// Returns [`CoreError::Clipboard`] if the host refuses the write.
  fn write_text(&mut self, text: &str) -> CoreResult<()>;
}

/// In-process clipboard for headless hosts.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
  contents: Option<String>,
}

impl MemoryClipboard {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn contents(&self) -> Option<&str> {
    self.contents.as_deref()
  }
}

impl Clipboard for MemoryClipboard {
  fn write_text(&mut self, text: &str) -> CoreResult<()> {
    self.contents = Some(text.to_string());
    Ok(())
  }
}

/// User-facing message the host should surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
  Alert(String),
}

/// A button that copies text and briefly acknowledges it.
///
/// Times are host milliseconds. The restore is scheduled by the first
/// acknowledged press and is not pushed back by later presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyButton {
  resting:        String,
  acknowledged:   String,
  feedback_ms:    u64,
  failure_alert:  Option<String>,
  ack_on_failure: bool,
  restore_at:     Option<u64>,
}

impl CopyButton {
  #[must_use]
  pub fn new(resting: &str, acknowledged: &str, feedback_ms: u64) -> Self {
    Self {
      resting: resting.to_string(),
      acknowledged: acknowledged.to_string(),
      feedback_ms,
      failure_alert: None,
      ack_on_failure: false,
      restore_at: None,
    }
  }

  /// Button appended to code blocks. It acknowledges every press, whether
  /// or not the clipboard accepted the text.
  #[must_use]
  pub fn code_block(config: &TocConfig) -> Self {
    let mut button = Self::new(
      &config.copy_label,
      &config.copied_label,
      config.copy_feedback_ms,
    );
    button.ack_on_failure = true;
    button
  }

  /// Button copying the page link; failures raise an alert.
  #[must_use]
  pub fn page_link(config: &TocConfig) -> Self {
    Self::new("Copy link", "\u{2713}", config.copy_feedback_ms)
      .with_failure_alert(COPY_LINK_FAILED)
  }

  #[must_use]
  pub fn with_failure_alert(mut self, message: &str) -> Self {
    self.failure_alert = Some(message.to_string());
    self
  }

  /// Label to display right now.
  #[must_use]
  pub fn label(&self) -> &str {
    if self.restore_at.is_some() {
      &self.acknowledged
    } else {
      &self.resting
    }
  }

  #[must_use]
  pub const fn restore_at(&self) -> Option<u64> {
    self.restore_at
  }

  /// Copy `text` at time `now_ms`.
  ///
  /// # Errors
  ///
  /// A failed write is logged and, for buttons with a failure alert,
  /// returns the [`Notice`] to show. Only code block buttons acknowledge a
  /// failed write; others keep their label.
  pub fn press<C: Clipboard + ?Sized>(
    &mut self,
    clipboard: &mut C,
    text: &str,
    now_ms: u64,
  ) -> Result<(), Option<Notice>> {
    let written = clipboard.write_text(text);
    if written.is_ok() || self.ack_on_failure {
      self.restore_at.get_or_insert(now_ms.saturating_add(self.feedback_ms));
    }
    if let Err(e) = written {
      error!("Failed to copy: {e}");
      return Err(self.failure_alert.clone().map(Notice::Alert));
    }
    debug!("Copied {} bytes", text.len());
    Ok(())
  }

  /// Restore the resting label once its deadline has passed. Returns `true`
  /// if the label changed.
  pub fn tick(&mut self, now_ms: u64) -> bool {
    match self.restore_at {
      Some(deadline) if now_ms >= deadline => {
        self.restore_at = None;
        true
      },
      _ => false,
    }
  }
}

/// Clipboard that rejects every write, for hosts without clipboard access.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
  fn write_text(&mut self, _text: &str) -> CoreResult<()> {
    Err(CoreError::Clipboard("no clipboard available".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_press_acknowledges_then_restores() {
    let mut clipboard = MemoryClipboard::new();
    let mut button = CopyButton::code_block(&TocConfig::default());
    assert_eq!(button.label(), "Copy");

    assert_eq!(button.press(&mut clipboard, "cargo build", 1_000), Ok(()));
    assert_eq!(clipboard.contents(), Some("cargo build"));
    assert_eq!(button.label(), "Copied!");

    assert!(!button.tick(2_999));
    assert!(button.tick(3_000));
    assert_eq!(button.label(), "Copy");
    assert!(!button.tick(4_000));
  }

  #[test]
  fn test_second_press_keeps_first_deadline() {
    let mut clipboard = MemoryClipboard::new();
    let mut button = CopyButton::code_block(&TocConfig::default());
    assert_eq!(button.press(&mut clipboard, "a", 0), Ok(()));
    assert_eq!(button.press(&mut clipboard, "b", 1_500), Ok(()));
    assert_eq!(button.restore_at(), Some(2_000));
    assert!(button.tick(2_000));
    assert_eq!(button.label(), "Copy");
  }

  #[test]
  fn test_link_failure_raises_alert() {
    let mut button = CopyButton::page_link(&TocConfig::default());
    assert_eq!(
      button.press(&mut NoClipboard, "https://example.com", 0),
      Err(Some(Notice::Alert("Failed to copy link".to_string())))
    );
    assert_eq!(button.label(), "Copy link");
    assert_eq!(button.restore_at(), None);
  }

  #[test]
  fn test_code_block_failure_still_acknowledges() {
    let mut button = CopyButton::code_block(&TocConfig::default());
    assert_eq!(button.press(&mut NoClipboard, "x", 0), Err(None));
    assert_eq!(button.label(), "Copied!");
    assert!(button.tick(2_000));
    assert_eq!(button.label(), "Copy");
  }
}
