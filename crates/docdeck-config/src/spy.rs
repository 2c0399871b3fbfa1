use docdeck_macros::Configurable;
use serde::{Deserialize, Serialize};

/// Visibility band of the scroll spy.
///
/// The band starts `top_margin_px` below the top of the viewport and ends
/// `bottom_exclusion` (a fraction of the viewport height) above its bottom,
/// so with the defaults only the upper fifth of the screen counts as "being
/// read".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct SpyConfig {
  pub top_margin_px: f64,

  pub bottom_exclusion: f64,
}

impl Default for SpyConfig {
  fn default() -> Self {
    Self {
      top_margin_px:    80.0,
      bottom_exclusion: 0.8,
    }
  }
}

impl SpyConfig {
  /// Check that the band is non-degenerate.
  ///
  /// # Errors
  ///
  /// Returns a description of the first invalid field.
  pub fn validate(&self) -> Result<(), String> {
    if !self.top_margin_px.is_finite() || self.top_margin_px < 0.0 {
      return Err(format!(
        "spy.top_margin_px must be a non-negative number, got {}",
        self.top_margin_px
      ));
    }
    if !(0.0..1.0).contains(&self.bottom_exclusion) {
      return Err(format!(
        "spy.bottom_exclusion must be in [0, 1), got {}",
        self.bottom_exclusion
      ));
    }
    Ok(())
  }
}
