//! Interactive table of contents: link clicks, scroll spy and fragments.
use log::{debug, trace};

use super::{
  outline::TocEntry,
  spy::{ScrollSpy, ViewportWatcher, VisibilityEvent},
};

/// Input events the TOC subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocEvent {
  /// The navigation link at this position was clicked.
  EntryClicked(usize),
  /// One delivery from the viewport watcher.
  Visibility(Vec<VisibilityEvent>),
}

/// Side effect the host performs on behalf of the TOC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocEffect {
  /// Scroll the element with this id into view, optionally after a delay.
  ScrollIntoView {
    id:       String,
    smooth:   bool,
    delay_ms: u64,
  },
  /// Replace the location fragment without jumping, e.g. `#usage`.
  PushFragment(String),
}

/// Owns the built entry list and the scroll spy over it.
///
/// Only constructible from a non-empty list of distinct ids, so the spy
/// never sees an id that was not assigned and exactly one entry is always
/// active.
#[derive(Debug, Clone)]
pub struct TocController {
  entries: Vec<TocEntry>,
  spy:     ScrollSpy,
}

impl TocController {
  /// Controller over `entries`, with the first entry active. `None` when the
  /// list is empty or two entries share an id.
  #[must_use]
  pub fn new(entries: Vec<TocEntry>) -> Option<Self> {
    let ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();
    let spy = ScrollSpy::new(&ids)?;
    Some(Self { entries, spy })
  }

  #[must_use]
  pub fn entries(&self) -> &[TocEntry] {
    &self.entries
  }

  /// Index of the sole active entry.
  #[must_use]
  pub const fn active(&self) -> usize {
    self.spy.active()
  }

  #[must_use]
  pub fn active_entry(&self) -> &TocEntry {
    // The spy only holds indices into `entries`
    &self.entries[self.spy.active()]
  }

  /// Handle a click on entry `index`.
  ///
  /// Returns the smooth scroll and fragment update to perform, or nothing
  /// for an index outside the list.
  pub fn click(&mut self, index: usize) -> Vec<TocEffect> {
    let Some(entry) = self.entries.get(index) else {
      trace!("Click on missing TOC entry {index}");
      return Vec::new();
    };
    let effects = vec![
      TocEffect::ScrollIntoView {
        id:       entry.id.clone(),
        smooth:   true,
        delay_ms: 0,
      },
      TocEffect::PushFragment(entry.href()),
    ];
    self.spy.activate(index);
    debug!("TOC entry '{}' clicked", entry.id);
    effects
  }

  /// Apply one watcher delivery and return the active index afterwards.
  pub fn observe(&mut self, batch: &[VisibilityEvent]) -> usize {
    self.spy.apply_batch(batch)
  }

  /// Reduce one input event into the effects to perform.
  pub fn handle(&mut self, event: TocEvent) -> Vec<TocEffect> {
    match event {
      TocEvent::EntryClicked(index) => self.click(index),
      TocEvent::Visibility(batch) => {
        self.observe(&batch);
        Vec::new()
      },
    }
  }

  /// Follow `watcher` for this page load, yielding the active index after
  /// every delivery.
  ///
  /// Lazy: unbounded watchers are fine as long as the caller stops pulling.
  pub fn follow<'a, W: ViewportWatcher>(
    &'a mut self,
    watcher: &'a mut W,
  ) -> impl Iterator<Item = usize> + 'a {
    let targets = self.entries.iter().map(|e| e.id.clone()).collect();
    watcher
      .observe(targets)
      .map(move |batch| self.spy.apply_batch(&batch))
  }

  /// Scroll request for a location fragment present at page load.
  ///
  /// The leading `#` is optional. Fragments that name no entry yield
  /// nothing; a matching entry becomes active.
  pub fn resolve_fragment(
    &mut self,
    fragment: &str,
    delay_ms: u64,
  ) -> Option<TocEffect> {
    let id = fragment.strip_prefix('#').unwrap_or(fragment);
    if id.is_empty() {
      return None;
    }
    let index = self.entries.iter().position(|entry| entry.id == id)?;
    self.spy.activate(index);
    Some(TocEffect::ScrollIntoView {
      id: id.to_string(),
      smooth: true,
      delay_ms,
    })
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;
  use crate::toc::{
    outline::{HeadingLevel, RawHeading, assign_ids, entries},
    spy::{BandWatcher, HeadingBox, PageLayout, VisibilityBand},
  };

  fn controller(texts: &[&str]) -> TocController {
    let raw: Vec<_> = texts
      .iter()
      .map(|text| {
        RawHeading {
          level: HeadingLevel::H2,
          text:  (*text).to_string(),
          id:    None,
        }
      })
      .collect();
    TocController::new(entries(&assign_ids(&raw))).unwrap()
  }

  #[test]
  fn test_empty_list_has_no_controller() {
    assert!(TocController::new(Vec::new()).is_none());
  }

  #[test]
  fn test_click_activates_only_that_entry() {
    let mut toc = controller(&["Intro", "Setup", "Usage"]);
    assert_eq!(toc.active(), 0);

    let effects = toc.click(2);
    assert_eq!(toc.active(), 2);
    assert_eq!(effects, vec![
      TocEffect::ScrollIntoView {
        id:       "usage".to_string(),
        smooth:   true,
        delay_ms: 0,
      },
      TocEffect::PushFragment("#usage".to_string()),
    ]);
  }

  #[test]
  fn test_duplicate_ids_have_no_controller() {
    let duplicated = ["a", "a", "b"]
      .iter()
      .enumerate()
      .map(|(heading, id)| {
        TocEntry {
          id: (*id).to_string(),
          text: (*id).to_string(),
          level: HeadingLevel::H2,
          heading,
        }
      })
      .collect();
    assert!(TocController::new(duplicated).is_none());
  }

  #[test]
  fn test_click_last_entry_activates_it() {
    let mut toc = controller(&["Intro", "Intro", "Usage"]);
    assert_eq!(toc.click(2).len(), 2);
    assert_eq!(toc.active(), 2);
    assert_eq!(toc.active_entry().id, "usage");
  }

  #[test]
  fn test_click_out_of_range_is_ignored() {
    let mut toc = controller(&["Intro", "Setup"]);
    assert!(toc.click(5).is_empty());
    assert_eq!(toc.active(), 0);
  }

  #[test]
  fn test_visibility_event_moves_highlight() {
    let mut toc = controller(&["Intro", "Setup", "Usage"]);
    let effects = toc.handle(TocEvent::Visibility(vec![
      VisibilityEvent::leaving("intro"),
      VisibilityEvent::entering("setup"),
    ]));
    assert!(effects.is_empty());
    assert_eq!(toc.active_entry().id, "setup");
  }

  #[test]
  fn test_follow_band_watcher() {
    let mut toc = controller(&["Intro", "Usage"]);
    let mut watcher = BandWatcher::new(
      PageLayout {
        viewport_height: 1000.0,
        headings:        vec![
          HeadingBox {
            top:    100.0,
            height: 30.0,
          },
          HeadingBox {
            top:    900.0,
            height: 30.0,
          },
        ],
        scroll_offsets:  vec![0.0, 800.0, 0.0],
      },
      VisibilityBand::default(),
    );
    let active: Vec<_> = toc.follow(&mut watcher).collect();
    assert_eq!(active, [0, 1, 0]);
  }

  #[test]
  fn test_resolve_fragment() {
    let mut toc = controller(&["Intro", "Usage"]);
    assert_eq!(
      toc.resolve_fragment("#usage", 100),
      Some(TocEffect::ScrollIntoView {
        id:       "usage".to_string(),
        smooth:   true,
        delay_ms: 100,
      })
    );
    assert_eq!(toc.active(), 1);
    assert_eq!(toc.resolve_fragment("#missing", 100), None);
    assert_eq!(toc.resolve_fragment("#", 100), None);
    assert_eq!(toc.active(), 1);
  }
}
