use docdeck_macros::Configurable;
use serde::{Deserialize, Serialize};

/// Markup contract and behaviour of the document page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct TocConfig {
  /// Region scanned for `h2`/`h3` headings.
  pub content_selector: String,

  /// Container the generated navigation links are appended to.
  pub nav_selector: String,

  /// Text shown in the navigation container when no heading exists.
  pub placeholder_text: String,

  /// Class toggled on the active navigation link.
  pub active_class: String,

  /// Whether `pre > code` blocks get a copy button.
  pub code_copy_buttons: bool,

  /// Label of a copy button at rest.
  pub copy_label: String,

  /// Label of a copy button right after a successful copy.
  pub copied_label: String,

  /// How long the acknowledgement label stays before it is restored.
  pub copy_feedback_ms: u64,

  /// Delay before scrolling to the heading named by the initial location
  /// fragment.
  pub hash_scroll_delay_ms: u64,
}

impl Default for TocConfig {
  fn default() -> Self {
    Self {
      content_selector:     ".doc-content".to_string(),
      nav_selector:         "#tableOfContents".to_string(),
      placeholder_text:     "No headings found".to_string(),
      active_class:         "active".to_string(),
      code_copy_buttons:    true,
      copy_label:           "Copy".to_string(),
      copied_label:         "Copied!".to_string(),
      copy_feedback_ms:     2000,
      hash_scroll_delay_ms: 100,
    }
  }
}
