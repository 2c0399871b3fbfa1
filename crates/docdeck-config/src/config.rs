use std::{
  fs,
  path::{Path, PathBuf},
};

use docdeck_macros::Configurable;
use serde::{Deserialize, Serialize};

use crate::{catalog, error::ConfigError, spy, toc};

/// Configuration for docdeck.
///
/// [`Config`] describes the markup contract of the catalog and document
/// pages (which selectors locate cards, pills, headings, and so on), the
/// visibility band of the scroll spy and the share providers offered on
/// document pages. Fields are typically loaded from a TOML or JSON config
/// file and can be overridden with `--config KEY=VALUE`.
#[derive(
  Debug, Clone, Default, PartialEq, Serialize, Deserialize, Configurable,
)]
#[serde(default)]
pub struct Config {
  /// Catalog page markup and display values.
  #[config(nested)]
  pub catalog: Option<catalog::CatalogConfig>,

  /// Document page markup and TOC behaviour.
  #[config(nested)]
  pub toc: Option<toc::TocConfig>,

  /// Scroll spy visibility band.
  #[config(nested)]
  pub spy: Option<spy::SpyConfig>,

  /// Share providers offered for a document, by name. A file that sets the
  /// list replaces it as a whole.
  #[config(key = "share_providers")]
  pub share_providers: Option<Vec<String>>,
}

/// Providers offered when no configuration names any.
pub const DEFAULT_SHARE_PROVIDERS: [&str; 3] =
  ["twitter", "linkedin", "facebook"];

impl Config {
  /// Catalog settings, falling back to defaults when the section is absent.
  #[must_use]
  pub fn catalog(&self) -> catalog::CatalogConfig {
    self.catalog.clone().unwrap_or_default()
  }

  /// Document page settings, falling back to defaults when the section is
  /// absent.
  #[must_use]
  pub fn toc(&self) -> toc::TocConfig {
    self.toc.clone().unwrap_or_default()
  }

  /// Scroll spy settings, falling back to defaults when the section is
  /// absent.
  #[must_use]
  pub fn spy(&self) -> spy::SpyConfig {
    self.spy.clone().unwrap_or_default()
  }

  /// Share provider names, falling back to [`DEFAULT_SHARE_PROVIDERS`].
  #[must_use]
  pub fn share_providers(&self) -> Vec<String> {
    self.share_providers.clone().unwrap_or_else(|| {
      DEFAULT_SHARE_PROVIDERS.map(str::to_string).to_vec()
    })
  }

  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files (or a discovered one), then
  /// apply `KEY=VALUE` overrides and validate the result.
  ///
  /// Explicit files are merged in order, later files overriding earlier ones.
  /// Without explicit files the working directory is searched with
  /// [`Config::find_config_file`]; without any file the defaults are used.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed,
  /// or the resulting configuration is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for config_path in rest {
        merged.merge(Self::from_file(config_path)?);
      }

      if !rest.is_empty() {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Nested sections are addressed with dotted keys, e.g.
  /// `spy.top_margin_px=64` or `catalog.card_display=block`.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - Sections and optional lists ([`Option<T>`]): other's [`Some`] replaces
  ///   this config's value as a whole
  /// - [`Vec<T>`] fields: other's items are appended, skipping duplicates
  pub fn merge(&mut self, other: Self) {
    self.merge_fields(other);
  }

  /// Search for config files in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let config_filenames = [
      "docdeck.toml",
      "docdeck.json",
      ".docdeck.toml",
      ".docdeck.json",
      ".config/docdeck.toml",
      ".config/docdeck.json",
    ];

    let current_dir = std::env::current_dir().ok()?;
    config_filenames
      .iter()
      .map(|filename| current_dir.join(filename))
      .find(|path| path.exists())
  }

  /// Validate values that deserialization alone cannot rule out.
  ///
  /// # Errors
  ///
  /// Returns an error listing every invalid value.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if let Err(e) = self.spy().validate() {
      errors.push(e);
    }

    let catalog = self.catalog();
    for (name, selector) in [
      ("catalog.grid_selector", &catalog.grid_selector),
      ("catalog.card_selector", &catalog.card_selector),
      ("catalog.pill_selector", &catalog.pill_selector),
      ("catalog.search_selector", &catalog.search_selector),
      ("catalog.empty_state_selector", &catalog.empty_state_selector),
    ] {
      if selector.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
      }
    }

    let toc = self.toc();
    for (name, selector) in [
      ("toc.content_selector", &toc.content_selector),
      ("toc.nav_selector", &toc.nav_selector),
    ] {
      if selector.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Config(format!(
        "Configuration validation errors:\n{}",
        errors.join("\n")
      )))
    }
  }

  /// Render the default configuration, with every section filled in, in the
  /// given format (`toml` or `json`).
  ///
  /// # Errors
  ///
  /// Returns an error for an unknown format or a serialization failure.
  pub fn default_config_text(format: &str) -> Result<String, ConfigError> {
    let config = Self {
      catalog: Some(catalog::CatalogConfig::default()),
      toc: Some(toc::TocConfig::default()),
      spy: Some(spy::SpyConfig::default()),
      share_providers: Some(
        DEFAULT_SHARE_PROVIDERS.map(str::to_string).to_vec(),
      ),
    };

    match format {
      "toml" => Ok(toml::to_string_pretty(&config)?),
      "json" => Ok(serde_json::to_string_pretty(&config)?),
      other => {
        Err(ConfigError::Config(format!(
          "Unsupported config format: '{other}'. Expected toml or json"
        )))
      },
    }
  }

  /// Write a default configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown or the file cannot be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = Self::default_config_text(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn test_accessors_fall_back_to_defaults() {
    let config = Config::default();
    assert_eq!(config.catalog().all_category, "All");
    assert_eq!(config.toc().nav_selector, "#tableOfContents");
    assert!((config.spy().top_margin_px - 80.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_config_merge_sections_replace() {
    let mut base = Config::default();
    base.catalog = Some(catalog::CatalogConfig {
      card_display: "block".to_string(),
      ..Default::default()
    });

    let mut other = Config::default();
    other.toc = Some(toc::TocConfig {
      placeholder_text: "Nothing here".to_string(),
      ..Default::default()
    });

    base.merge(other);

    // catalog was None in other, so it stays
    assert_eq!(base.catalog().card_display, "block");
    assert_eq!(base.toc().placeholder_text, "Nothing here");
  }

  #[test]
  fn test_config_merge_share_providers_replace() {
    let mut base = Config::default();
    base.share_providers = Some(vec!["twitter".to_string()]);

    // Unset in other, so the earlier choice stands
    base.merge(Config::default());
    assert_eq!(base.share_providers(), ["twitter"]);

    let mut other = Config::default();
    other.share_providers = Some(vec!["facebook".to_string()]);
    base.merge(other);
    assert_eq!(base.share_providers(), ["facebook"]);
  }

  #[test]
  fn test_share_providers_default() {
    assert_eq!(Config::default().share_providers(), [
      "twitter", "linkedin", "facebook"
    ]);
  }

  #[test]
  fn test_apply_overrides_nested() {
    let mut config = Config::default();

    config
      .apply_overrides(&[
        "catalog.all_category=Everything".to_string(),
        "spy.top_margin_px=64".to_string(),
        "toc.code_copy_buttons=no".to_string(),
        "toc.copy_feedback_ms=500".to_string(),
      ])
      .unwrap();

    assert_eq!(config.catalog().all_category, "Everything");
    assert!((config.spy().top_margin_px - 64.0).abs() < f64::EPSILON);
    assert!(!config.toc().code_copy_buttons);
    assert_eq!(config.toc().copy_feedback_ms, 500);
  }

  #[test]
  fn test_apply_overrides_list() {
    let mut config = Config::default();
    config
      .apply_overrides(&["share_providers=linkedin, twitter".to_string()])
      .unwrap();
    assert_eq!(config.share_providers(), ["linkedin", "twitter"]);
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();
    let result = config.apply_overrides(&["no_equals_sign".to_string()]);
    assert!(result.unwrap_err().to_string().contains("Expected KEY=VALUE"));
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();

    let result = config.apply_overrides(&["unknown_key=value".to_string()]);
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Unknown configuration key")
    );

    let result = config.apply_overrides(&["toc.nope=value".to_string()]);
    assert!(result.is_err());
  }

  #[test]
  fn test_apply_overrides_invalid_boolean() {
    let mut config = Config::default();
    let result =
      config.apply_overrides(&["toc.code_copy_buttons=maybe".to_string()]);
    assert!(result.unwrap_err().to_string().contains("Invalid boolean"));
  }

  #[test]
  fn test_apply_overrides_invalid_numeric() {
    let mut config = Config::default();
    let result =
      config.apply_overrides(&["spy.bottom_exclusion=lots".to_string()]);
    assert!(result.unwrap_err().to_string().contains("Invalid value"));
  }

  #[test]
  fn test_validate_rejects_empty_selector() {
    let mut config = Config::default();
    config.apply_override("toc.nav_selector", "").unwrap();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("toc.nav_selector"));
  }

  #[test]
  fn test_default_config_round_trips_through_toml() {
    let text = Config::default_config_text("toml").unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.catalog(), catalog::CatalogConfig::default());
    assert_eq!(parsed.share_providers(), DEFAULT_SHARE_PROVIDERS);
    assert!(parsed.share_providers.is_some());
  }

  #[test]
  fn test_default_config_rejects_unknown_format() {
    assert!(Config::default_config_text("yaml").is_err());
  }

  #[test]
  fn test_from_file_json_and_toml() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("docdeck.toml");
    fs::write(&toml_path, "[catalog]\ncard_display = \"block\"\n").unwrap();
    let from_toml = Config::from_file(&toml_path).unwrap();
    assert_eq!(from_toml.catalog().card_display, "block");
    // Missing keys in a present section use defaults
    assert_eq!(from_toml.catalog().grid_display, "grid");

    let json_path = dir.path().join("docdeck.json");
    fs::write(&json_path, r#"{"spy": {"bottom_exclusion": 0.5}}"#).unwrap();
    let from_json = Config::from_file(&json_path).unwrap();
    assert!((from_json.spy().bottom_exclusion - 0.5).abs() < f64::EPSILON);

    let yaml_path = dir.path().join("docdeck.yaml");
    fs::write(&yaml_path, "spy: {}").unwrap();
    assert!(Config::from_file(&yaml_path).is_err());
  }

  #[test]
  fn test_load_merges_files_then_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.toml");
    let second = dir.path().join("b.toml");
    fs::write(&first, "[toc]\nplaceholder_text = \"First\"\n").unwrap();
    fs::write(&second, "[spy]\ntop_margin_px = 10.0\n").unwrap();

    let config = Config::load(&[first, second], &[
      "toc.copy_label=Grab".to_string(),
    ])
    .unwrap();

    assert_eq!(config.toc().placeholder_text, "First");
    assert_eq!(config.toc().copy_label, "Grab");
    assert!((config.spy().top_margin_px - 10.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_load_keeps_providers_from_earlier_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.toml");
    let second = dir.path().join("b.toml");
    fs::write(&first, "share_providers = [\"facebook\"]\n").unwrap();
    fs::write(&second, "[toc]\nplaceholder_text = \"x\"\n").unwrap();

    let config = Config::load(&[first, second], &[]).unwrap();
    assert_eq!(config.share_providers(), ["facebook"]);
    assert_eq!(config.toc().placeholder_text, "x");
  }

  #[test]
  fn test_load_rejects_invalid_band() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[spy]\nbottom_exclusion = 1.5\n").unwrap();

    assert!(Config::load(&[path], &[]).is_err());
  }
}
