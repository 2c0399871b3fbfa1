use docdeck_macros::Configurable;
use serde::{Deserialize, Serialize};

/// Markup contract of the catalog page.
///
/// Selectors are plain CSS selectors. The display values are written into
/// the `style` attribute of the matching elements when the filter result is
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct CatalogConfig {
  /// Card container (the grid).
  pub grid_selector: String,

  /// Cards, looked up inside the grid.
  pub card_selector: String,

  /// Category pills.
  pub pill_selector: String,

  /// Free-text search input.
  pub search_selector: String,

  /// "No results" indicator.
  pub empty_state_selector: String,

  /// Category sentinel meaning "no category restriction".
  pub all_category: String,

  /// Class toggled on the active pill.
  pub active_class: String,

  /// `display` value of a visible card.
  pub card_display: String,

  /// `display` value of the grid while any card is visible.
  pub grid_display: String,

  /// `display` value of the empty-state indicator while it is shown.
  pub empty_display: String,

  /// Path prefix of document pages; cards link to `{docs_base_path}/{id}`.
  pub docs_base_path: String,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      grid_selector:        "#docsGrid".to_string(),
      card_selector:        ".doc-card".to_string(),
      pill_selector:        "#categoryFilters .filter-pill".to_string(),
      search_selector:      "#searchInput".to_string(),
      empty_state_selector: "#noResults".to_string(),
      all_category:         "All".to_string(),
      active_class:         "active".to_string(),
      card_display:         "flex".to_string(),
      grid_display:         "grid".to_string(),
      empty_display:        "block".to_string(),
      docs_base_path:       "/docs".to_string(),
    }
  }
}
