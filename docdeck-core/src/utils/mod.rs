use unicode_normalization::UnicodeNormalization;

/// Slugify a string for use as an anchor ID.
///
/// Lower-cases the text, decomposes it (NFD) so that accented letters lose
/// their diacritics, drops everything outside `[a-z0-9]`, whitespace and `-`,
/// then trims and joins the remaining words with single dashes.
///
/// Returns an empty string when nothing survives the filter; callers decide
/// the fallback.
#[must_use]
pub fn slugify(text: &str) -> String {
  let filtered: String = text
    .to_lowercase()
    .nfd()
    .filter(|c| {
      c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || *c == '-'
        || c.is_whitespace()
    })
    .collect();

  let mut slug = String::with_capacity(filtered.len());
  for c in filtered.trim().chars() {
    let c = if c.is_whitespace() { '-' } else { c };
    if c == '-' && slug.ends_with('-') {
      continue;
    }
    slug.push(c);
  }
  slug
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify_basic() {
    assert_eq!(slugify("Getting Started!"), "getting-started");
    assert_eq!(slugify("Setup"), "setup");
  }

  #[test]
  fn test_slugify_strips_diacritics() {
    assert_eq!(slugify("Café Déjà Vu"), "cafe-deja-vu");
    assert_eq!(slugify("Configuración básica"), "configuracion-basica");
    assert_eq!(slugify("Ünïcödé"), "unicode");
  }

  #[test]
  fn test_slugify_collapses_separators() {
    assert_eq!(slugify("  spaced   out  "), "spaced-out");
    assert_eq!(slugify("a -- b"), "a-b");
    assert_eq!(slugify("C++ & Rust"), "c-rust");
    assert_eq!(slugify("tabs\tand\nnewlines"), "tabs-and-newlines");
  }

  #[test]
  fn test_slugify_drops_underscores_and_punctuation() {
    assert_eq!(slugify("snake_case (v2.0)"), "snakecase-v20");
  }

  #[test]
  fn test_slugify_keeps_leading_dash() {
    // Only whitespace is trimmed, dashes at the edges survive
    assert_eq!(slugify("- draft"), "-draft");
  }

  #[test]
  fn test_slugify_empty_results() {
    assert_eq!(slugify("!!!"), "");
    assert_eq!(slugify(""), "");
    assert_eq!(slugify("日本語"), "");
  }
}
