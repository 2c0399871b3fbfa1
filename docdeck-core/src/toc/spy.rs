//! Scroll spy: reduces viewport visibility events to one active TOC entry.
//!
//! Visibility is delivered by a [`ViewportWatcher`] in batches, one per
//! observer callback. Events are applied one after another, so when several
//! headings enter the band in the same batch the last one processed wins.
use std::collections::HashMap;

use docdeck_config::spy::SpyConfig;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// A heading crossing the edge of the visibility band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityEvent {
  pub target_id:       String,
  pub is_intersecting: bool,
}

impl VisibilityEvent {
  #[must_use]
  pub fn entering(target_id: &str) -> Self {
    Self {
      target_id:       target_id.to_string(),
      is_intersecting: true,
    }
  }

  #[must_use]
  pub fn leaving(target_id: &str) -> Self {
    Self {
      target_id:       target_id.to_string(),
      is_intersecting: false,
    }
  }
}

/// Capability that reports when watched headings enter or leave the
/// visibility band.
///
/// Each call to `observe` starts a fresh sequence for one page load. Every
/// item is one delivery; live hosts may produce an unbounded sequence.
pub trait ViewportWatcher {
  fn observe(
    &mut self,
    targets: Vec<String>,
  ) -> impl Iterator<Item = Vec<VisibilityEvent>> + '_;
}

/// Tracks the single active entry.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
  positions: HashMap<String, usize>,
  len:       usize,
  active:    usize,
}

impl ScrollSpy {
  /// Spy over the given entry ids, with the first entry active.
  ///
  /// Returns `None` for an empty list, or when two entries share an id and
  /// visibility could not tell them apart.
  #[must_use]
  pub fn new(ids: &[String]) -> Option<Self> {
    if ids.is_empty() {
      return None;
    }
    let positions: HashMap<String, usize> = ids
      .iter()
      .enumerate()
      .map(|(index, id)| (id.clone(), index))
      .collect();
    if positions.len() != ids.len() {
      debug!("Duplicate TOC entry ids, not spying");
      return None;
    }
    Some(Self {
      positions,
      len: ids.len(),
      active: 0,
    })
  }

  #[must_use]
  pub const fn active(&self) -> usize {
    self.active
  }

  /// Make `index` the sole active entry. Out of range indices are ignored.
  pub fn activate(&mut self, index: usize) -> bool {
    if index >= self.len {
      return false;
    }
    self.active = index;
    true
  }

  /// Apply one event; returns the new active index if it changed.
  ///
  /// Only headings entering the band matter; leaving events and ids without
  /// an entry keep the current entry active.
  pub fn apply(&mut self, event: &VisibilityEvent) -> Option<usize> {
    if !event.is_intersecting {
      return None;
    }
    let Some(&index) = self.positions.get(&event.target_id) else {
      trace!("No TOC entry for visible target '{}'", event.target_id);
      return None;
    };
    if index == self.active {
      return None;
    }
    self.active = index;
    Some(index)
  }

  /// Apply a batch in delivery order and return the resulting active index.
  pub fn apply_batch<'a, I>(&mut self, events: I) -> usize
  where
    I: IntoIterator<Item = &'a VisibilityEvent>,
  {
    for event in events {
      self.apply(event);
    }
    self.active
  }
}

/// Viewport region in which a heading counts as "being read".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityBand {
  pub top_margin_px:    f64,
  pub bottom_exclusion: f64,
}

impl From<&SpyConfig> for VisibilityBand {
  fn from(config: &SpyConfig) -> Self {
    Self {
      top_margin_px:    config.top_margin_px,
      bottom_exclusion: config.bottom_exclusion,
    }
  }
}

impl Default for VisibilityBand {
  fn default() -> Self {
    Self::from(&SpyConfig::default())
  }
}

impl VisibilityBand {
  /// Band in document coordinates for a scroll offset, or `None` when the
  /// margins leave no room in a viewport this small.
  #[must_use]
  pub fn span(
    &self,
    scroll_offset: f64,
    viewport_height: f64,
  ) -> Option<(f64, f64)> {
    let top = scroll_offset + self.top_margin_px;
    let bottom = scroll_offset + viewport_height
      - viewport_height * self.bottom_exclusion;
    (top <= bottom).then_some((top, bottom))
  }
}

/// Vertical extent of a heading in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingBox {
  pub top:    f64,
  #[serde(default)]
  pub height: f64,
}

impl HeadingBox {
  fn intersects(&self, band: Option<(f64, f64)>) -> bool {
    band.is_some_and(|(top, bottom)| {
      self.top <= bottom && self.top + self.height >= top
    })
  }
}

/// Static page geometry plus the scroll positions to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
  pub viewport_height: f64,
  /// One box per heading, in document order.
  pub headings:        Vec<HeadingBox>,
  /// Scroll offsets, one per frame.
  pub scroll_offsets:  Vec<f64>,
}

/// Deterministic [`ViewportWatcher`] over a [`PageLayout`].
///
/// The first frame reports every target, as an intersection observer does
/// right after `observe`; later frames report only targets whose state
/// changed, in document order. Frames without changes yield an empty batch
/// so batches stay aligned with scroll offsets.
#[derive(Debug, Clone)]
pub struct BandWatcher {
  layout: PageLayout,
  band:   VisibilityBand,
}

impl BandWatcher {
  #[must_use]
  pub const fn new(layout: PageLayout, band: VisibilityBand) -> Self {
    Self { layout, band }
  }
}

impl ViewportWatcher for BandWatcher {
  fn observe(
    &mut self,
    targets: Vec<String>,
  ) -> impl Iterator<Item = Vec<VisibilityEvent>> + '_ {
    if targets.len() != self.layout.headings.len() {
      debug!(
        "Watching {} targets with {} heading boxes, extra items are ignored",
        targets.len(),
        self.layout.headings.len()
      );
    }

    let watched: Vec<(String, HeadingBox)> = targets
      .into_iter()
      .zip(self.layout.headings.iter().copied())
      .collect();
    let mut previous: Option<Vec<bool>> = None;
    let band = self.band;
    let viewport_height = self.layout.viewport_height;

    self.layout.scroll_offsets.iter().map(move |&offset| {
      let span = band.span(offset, viewport_height);
      let current: Vec<bool> = watched
        .iter()
        .map(|(_, heading)| heading.intersects(span))
        .collect();

      let batch = watched
        .iter()
        .zip(&current)
        .enumerate()
        .filter(|(index, (_, now))| {
          previous
            .as_ref()
            .is_none_or(|before| before.get(*index) != Some(*now))
        })
        .map(|(_, ((id, _), now))| {
          VisibilityEvent {
            target_id:       id.clone(),
            is_intersecting: *now,
          }
        })
        .collect();

      previous = Some(current);
      batch
    })
  }
}
