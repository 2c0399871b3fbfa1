//! Heading discovery results, anchor id assignment and TOC entries.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::utils::slugify;

/// Heading levels that appear in the table of contents.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum HeadingLevel {
  H2,
  H3,
}

impl HeadingLevel {
  /// Level for an element tag name; `None` for anything but `h2`/`h3`.
  #[must_use]
  pub fn from_tag(tag: &str) -> Option<Self> {
    match tag.to_ascii_lowercase().as_str() {
      "h2" => Some(Self::H2),
      "h3" => Some(Self::H3),
      _ => None,
    }
  }

  #[must_use]
  pub const fn as_u8(self) -> u8 {
    match self {
      Self::H2 => 2,
      Self::H3 => 3,
    }
  }
}

/// A heading as found in the content region, before id assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeading {
  pub level: HeadingLevel,
  /// Visible text content.
  pub text:  String,
  /// Identifier already present on the element, if any.
  pub id:    Option<String>,
}

/// A heading with its resolved, page-unique anchor id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
  pub level: HeadingLevel,
  pub text:  String,
  pub id:    String,
}

/// One navigation link of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
  pub id:      String,
  pub text:    String,
  pub level:   HeadingLevel,
  /// Position of the heading this entry points at, in document order.
  pub heading: usize,
}

impl TocEntry {
  /// Fragment used as the link target, e.g. `#getting-started`.
  #[must_use]
  pub fn href(&self) -> String {
    format!("#{}", self.id)
  }
}

/// Hands out anchor ids that are unique within one page.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
  used: HashSet<String>,
}

impl IdAllocator {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Candidate id for the heading at `index`: its own id when present,
  /// otherwise its slugified text, otherwise `heading-<index>`.
  #[must_use]
  pub fn candidate(heading: &RawHeading, index: usize) -> String {
    match heading.id.as_deref() {
      Some(id) if !id.is_empty() => id.to_string(),
      _ => {
        let slug = slugify(heading.text.trim());
        if slug.is_empty() {
          format!("heading-{index}")
        } else {
          slug
        }
      },
    }
  }

  /// Claim `candidate`, or the first free `candidate-N` for N = 2, 3, ...
  pub fn claim(&mut self, candidate: &str) -> String {
    let mut unique = candidate.to_string();
    let mut counter = 2_usize;
    while self.used.contains(&unique) {
      unique = format!("{candidate}-{counter}");
      counter += 1;
    }
    self.used.insert(unique.clone());
    unique
  }
}

/// Assign every heading a page-unique id, in document order.
#[must_use]
pub fn assign_ids(raw: &[RawHeading]) -> Vec<Heading> {
  let mut allocator = IdAllocator::new();
  raw
    .iter()
    .enumerate()
    .map(|(index, heading)| {
      let candidate = IdAllocator::candidate(heading, index);
      Heading {
        level: heading.level,
        text:  heading.text.trim().to_string(),
        id:    allocator.claim(&candidate),
      }
    })
    .collect()
}

/// One navigation entry per heading, in document order.
#[must_use]
pub fn entries(headings: &[Heading]) -> Vec<TocEntry> {
  headings
    .iter()
    .enumerate()
    .map(|(index, heading)| {
      TocEntry {
        id:      heading.id.clone(),
        text:    heading.text.clone(),
        level:   heading.level,
        heading: index,
      }
    })
    .collect()
}
