//! Catalog filter state, events and the visibility projection.
use log::{debug, warn};

use super::card::DocumentCard;

/// Current filter inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
  selected_category: String,
  search_query:      String,
}

impl FilterState {
  /// State with no restriction: the `all` sentinel and an empty query.
  #[must_use]
  pub fn new(all_category: &str) -> Self {
    Self {
      selected_category: all_category.to_string(),
      search_query:      String::new(),
    }
  }

  #[must_use]
  pub fn selected_category(&self) -> &str {
    &self.selected_category
  }

  /// The lower-cased search query.
  #[must_use]
  pub fn search_query(&self) -> &str {
    &self.search_query
  }

  /// Replace the selected category.
  #[must_use]
  pub fn with_category(mut self, category: &str) -> Self {
    category.clone_into(&mut self.selected_category);
    self
  }

  /// Replace the query, normalizing it to lower case.
  #[must_use]
  pub fn with_query(mut self, raw: &str) -> Self {
    self.search_query = raw.to_lowercase();
    self
  }
}

/// Input events the filter subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
  /// A category pill was activated.
  CategorySelected(String),
  /// The search box text changed.
  QueryChanged(String),
}

/// Which of the two mutually exclusive regions is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridDisplay {
  /// At least one card is visible: the grid is shown, the empty state hidden.
  Cards,
  /// No card is visible: the empty state is shown, the grid hidden.
  EmptyState,
}

/// Result of one filter pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
  visible: Vec<bool>,
}

impl CatalogView {
  /// Per-card visibility, in card order.
  #[must_use]
  pub fn visibility(&self) -> &[bool] {
    &self.visible
  }

  #[must_use]
  pub fn is_visible(&self, index: usize) -> bool {
    self.visible.get(index).copied().unwrap_or(false)
  }

  #[must_use]
  pub fn visible_count(&self) -> usize {
    self.visible.iter().filter(|visible| **visible).count()
  }

  #[must_use]
  pub fn display(&self) -> GridDisplay {
    if self.visible_count() == 0 {
      GridDisplay::EmptyState
    } else {
      GridDisplay::Cards
    }
  }
}

/// Compute card visibility for a filter state.
///
/// Pure: identical inputs always produce identical views.
#[must_use]
pub fn recompute(
  cards: &[DocumentCard],
  state: &FilterState,
  all_category: &str,
) -> CatalogView {
  CatalogView {
    visible: cards
      .iter()
      .map(|card| {
        card.matches_category(&state.selected_category, all_category)
          && card.matches_query(&state.search_query)
      })
      .collect(),
  }
}

/// Owns the filter state of one catalog page view.
///
/// Events are reduced into a new [`FilterState`] and every change triggers a
/// [`recompute`]. When the page has a pill bar, exactly one pill is active at
/// all times and it always names the selected category.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
  cards:        Vec<DocumentCard>,
  pills:        Vec<String>,
  active_pill:  Option<usize>,
  all_category: String,
  state:        FilterState,
  view:         CatalogView,
}

impl CatalogFilter {
  /// Create a filter over `cards` with no restriction.
  ///
  /// `pills` lists the category of each pill in the pill bar; an empty list
  /// means the page has no pill bar.
  #[must_use]
  pub fn new(
    cards: Vec<DocumentCard>,
    pills: Vec<String>,
    all_category: &str,
  ) -> Self {
    Self::with_state(cards, pills, all_category, FilterState::new(all_category))
  }

  /// Create a filter starting from an explicit state (e.g. the pill marked
  /// active and the search box value found in the markup).
  ///
  /// If the page has pills but none names the initial category, the first
  /// pill becomes active and its category is selected instead.
  #[must_use]
  pub fn with_state(
    cards: Vec<DocumentCard>,
    pills: Vec<String>,
    all_category: &str,
    state: FilterState,
  ) -> Self {
    let mut state = state;
    let active_pill = if pills.is_empty() {
      None
    } else if let Some(index) =
      pills.iter().position(|pill| *pill == state.selected_category)
    {
      Some(index)
    } else {
      debug!(
        "No pill for initial category '{}', selecting '{}'",
        state.selected_category, pills[0]
      );
      state = state.with_category(&pills[0]);
      Some(0)
    };

    let view = recompute(&cards, &state, all_category);
    Self {
      cards,
      pills,
      active_pill,
      all_category: all_category.to_string(),
      state,
      view,
    }
  }

  /// Select a category.
  ///
  /// Returns `false` and leaves the state untouched when the page has a pill
  /// bar without a pill for `category`, since no pill could mirror it.
  pub fn set_category(&mut self, category: &str) -> bool {
    if !self.pills.is_empty() {
      let Some(index) = self.pills.iter().position(|pill| pill == category)
      else {
        warn!("Ignoring unknown category '{category}'");
        return false;
      };
      self.active_pill = Some(index);
    }

    self.state = self.state.clone().with_category(category);
    self.recompute();
    true
  }

  /// Set the search text; it is lower-cased before it is stored.
  pub fn set_query(&mut self, raw: &str) {
    self.state = self.state.clone().with_query(raw);
    self.recompute();
  }

  /// Reduce one input event and return the refreshed view.
  pub fn handle(&mut self, event: FilterEvent) -> &CatalogView {
    match event {
      FilterEvent::CategorySelected(category) => {
        self.set_category(&category);
      },
      FilterEvent::QueryChanged(raw) => self.set_query(&raw),
    }
    &self.view
  }

  /// Recompute visibility from the current state.
  pub fn recompute(&mut self) -> &CatalogView {
    self.view = recompute(&self.cards, &self.state, &self.all_category);
    debug!(
      "Filter '{}' / '{}': {} of {} cards visible",
      self.state.selected_category,
      self.state.search_query,
      self.view.visible_count(),
      self.cards.len()
    );
    &self.view
  }

  #[must_use]
  pub const fn view(&self) -> &CatalogView {
    &self.view
  }

  #[must_use]
  pub const fn state(&self) -> &FilterState {
    &self.state
  }

  #[must_use]
  pub fn cards(&self) -> &[DocumentCard] {
    &self.cards
  }

  #[must_use]
  pub fn pills(&self) -> &[String] {
    &self.pills
  }

  /// Index of the active pill, `None` only when there is no pill bar.
  #[must_use]
  pub const fn active_pill(&self) -> Option<usize> {
    self.active_pill
  }

  /// Cards visible in the current view.
  pub fn visible_cards(&self) -> impl Iterator<Item = &DocumentCard> {
    self
      .cards
      .iter()
      .zip(self.view.visibility())
      .filter_map(|(card, visible)| visible.then_some(card))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn card(id: &str, category: &str, title: &str, tags: &str) -> DocumentCard {
    DocumentCard {
      id:          id.to_string(),
      category:    category.to_string(),
      title:       title.to_string(),
      description: format!("About {title}"),
      tags:        tags.to_string(),
    }
  }

  fn guides() -> Vec<DocumentCard> {
    vec![
      card("intro", "Guides", "Introduction", "beginner,setup"),
      card("reference", "API", "Endpoint Reference", "rest,http"),
      card("deploy", "Guides", "Deploying", "ops,setup"),
    ]
  }

  #[test]
  fn new_filter_shows_everything() {
    let filter = CatalogFilter::new(guides(), Vec::new(), "All");
    assert_eq!(filter.view().visible_count(), 3);
    assert_eq!(filter.view().display(), GridDisplay::Cards);
    assert_eq!(filter.active_pill(), None);
  }

  #[test]
  fn selecting_a_category_keeps_only_its_cards() {
    let mut filter = CatalogFilter::new(guides(), Vec::new(), "All");
    assert!(filter.set_category("Guides"));
    assert_eq!(filter.view().visibility(), &[true, false, true]);

    // Any query both guides match keeps them both
    filter.set_query("setup");
    assert_eq!(filter.view().visible_count(), 2);
    filter.set_query("");
    assert_eq!(filter.view().visible_count(), 2);
  }

  #[test]
  fn query_is_lower_cased() {
    let mut filter = CatalogFilter::new(guides(), Vec::new(), "All");
    filter.set_query("ENDPOINT");
    assert_eq!(filter.state().search_query(), "endpoint");
    assert_eq!(filter.view().visibility(), &[false, true, false]);
  }

  #[test]
  fn tags_match_without_title_match() {
    let cards = vec![card(
      "sso",
      "Security",
      "Single Sign-On",
      "authentication,security",
    )];
    let mut filter = CatalogFilter::new(cards, Vec::new(), "All");
    filter.set_query("auth");
    assert_eq!(filter.view().visible_count(), 1);
  }

  #[test]
  fn no_match_switches_to_empty_state() {
    let mut filter = CatalogFilter::new(guides(), Vec::new(), "All");
    filter.handle(FilterEvent::QueryChanged("kubernetes".to_string()));
    assert_eq!(filter.view().visible_count(), 0);
    assert_eq!(filter.view().display(), GridDisplay::EmptyState);

    filter.handle(FilterEvent::QueryChanged(String::new()));
    assert_eq!(filter.view().display(), GridDisplay::Cards);
  }

  #[test]
  fn pills_mirror_selected_category() {
    let pills = vec!["All".to_string(), "Guides".to_string(), "API".into()];
    let mut filter = CatalogFilter::new(guides(), pills, "All");
    assert_eq!(filter.active_pill(), Some(0));

    filter.handle(FilterEvent::CategorySelected("API".to_string()));
    assert_eq!(filter.active_pill(), Some(2));
    assert_eq!(filter.state().selected_category(), "API");
  }

  #[test]
  fn unknown_category_is_ignored_with_pills() {
    let pills = vec!["All".to_string(), "Guides".to_string()];
    let mut filter = CatalogFilter::new(guides(), pills, "All");
    assert!(!filter.set_category("Cooking"));
    assert_eq!(filter.active_pill(), Some(0));
    assert_eq!(filter.state().selected_category(), "All");
    assert_eq!(filter.view().visible_count(), 3);
  }

  #[test]
  fn missing_initial_pill_falls_back_to_first() {
    let pills = vec!["Guides".to_string(), "API".to_string()];
    let filter = CatalogFilter::new(guides(), pills, "All");
    assert_eq!(filter.active_pill(), Some(0));
    assert_eq!(filter.state().selected_category(), "Guides");
    assert_eq!(filter.view().visible_count(), 2);
  }

  #[test]
  fn recompute_is_deterministic() {
    let cards = guides();
    let state = FilterState::new("All").with_category("Guides").with_query("DEP");
    let first = recompute(&cards, &state, "All");
    let second = recompute(&cards, &state, "All");
    assert_eq!(first, second);
    assert_eq!(first.visibility(), &[false, false, true]);
  }

  #[test]
  fn visible_cards_follow_view() {
    let mut filter = CatalogFilter::new(guides(), Vec::new(), "All");
    filter.set_category("API");
    let ids: Vec<_> = filter.visible_cards().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["reference"]);
  }
}
