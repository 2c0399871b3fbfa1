use docdeck_config::catalog::CatalogConfig;
use kuchikikiki::NodeRef;
use log::{debug, info, warn};

use super::{
  attr,
  has_class,
  parse,
  select_all,
  select_first,
  set_attr,
  set_display,
  to_html,
  toggle_class,
};
use crate::{
  catalog::{
    CardInput,
    CatalogFilter,
    CatalogView,
    DocumentCard,
    FilterEvent,
    FilterState,
    GridDisplay,
    Navigation,
    activate,
  },
  error::CoreResult,
};

/// Catalog page binding: owns the parsed page and its [`CatalogFilter`].
#[derive(Debug)]
pub struct CatalogPage {
  document:    NodeRef,
  config:      CatalogConfig,
  grid:        NodeRef,
  empty_state: Option<NodeRef>,
  search:      Option<NodeRef>,
  cards:       Vec<NodeRef>,
  /// Cards without a category; never shown while the catalog is bound.
  skipped:     Vec<NodeRef>,
  pills:       Vec<NodeRef>,
  raw_query:   String,
  filter:      CatalogFilter,
}

impl CatalogPage {
  /// Bind to a catalog page and run the initial filter pass.
  ///
  /// The initial state comes from the markup: the pill carrying the active
  /// class and the search box `value`. Returns `Ok(None)` when the page has
  /// no card grid.
  ///
  /// # Errors
  ///
  /// Returns an error if a configured selector is invalid.
  pub fn load(html: &str, config: &CatalogConfig) -> CoreResult<Option<Self>> {
    let document = parse(html);
    let Some(grid) = select_first(&document, &config.grid_selector)? else {
      debug!("No card grid '{}', catalog disabled", config.grid_selector);
      return Ok(None);
    };

    let mut cards = Vec::new();
    let mut skipped = Vec::new();
    let mut card_data = Vec::new();
    for node in select_all(&grid, &config.card_selector)? {
      match read_card(&node) {
        Some(card) => {
          cards.push(node);
          card_data.push(card);
        },
        None => {
          warn!("Hiding document card without a category");
          skipped.push(node);
        },
      }
    }

    let mut pills = Vec::new();
    let mut pill_categories = Vec::new();
    let mut initial_category = None;
    for node in select_all(&document, &config.pill_selector)? {
      let Some(category) = attr(&node, "data-category") else {
        debug!("Skipping pill without data-category");
        continue;
      };
      if initial_category.is_none() && has_class(&node, &config.active_class)
      {
        initial_category = Some(category.clone());
      }
      pills.push(node);
      pill_categories.push(category);
    }

    let empty_state = select_first(&document, &config.empty_state_selector)?;
    let search = select_first(&document, &config.search_selector)?;
    let raw_query = search
      .as_ref()
      .and_then(|input| attr(input, "value"))
      .unwrap_or_default();

    let state = FilterState::new(&config.all_category)
      .with_category(
        initial_category.as_deref().unwrap_or(&config.all_category),
      )
      .with_query(&raw_query);
    let filter = CatalogFilter::with_state(
      card_data,
      pill_categories,
      &config.all_category,
      state,
    );

    info!(
      "Catalog initialized: {} cards, {} pills, {} visible",
      cards.len(),
      pills.len(),
      filter.view().visible_count()
    );

    let page = Self {
      document,
      config: config.clone(),
      grid,
      empty_state,
      search,
      cards,
      skipped,
      pills,
      raw_query,
      filter,
    };
    page.render();
    Ok(Some(page))
  }

  /// Reduce one input event and re-render.
  pub fn handle(&mut self, event: FilterEvent) -> &CatalogView {
    if let FilterEvent::QueryChanged(raw) = &event {
      raw.clone_into(&mut self.raw_query);
    }
    self.filter.handle(event);
    self.render();
    self.filter.view()
  }

  /// Navigation for input on the card at `index`. Hidden cards cannot be
  /// activated.
  #[must_use]
  pub fn activate_card(
    &self,
    index: usize,
    input: CardInput,
  ) -> Option<Navigation> {
    if !self.filter.view().is_visible(index) {
      return None;
    }
    let card = self.filter.cards().get(index)?;
    activate(card, input, &self.config.docs_base_path)
  }

  /// Project the current view onto the markup. Idempotent.
  pub fn render(&self) {
    let view = self.filter.view();
    for (index, card) in self.cards.iter().enumerate() {
      let display = if view.is_visible(index) {
        self.config.card_display.as_str()
      } else {
        "none"
      };
      set_display(card, display);
    }
    for card in &self.skipped {
      set_display(card, "none");
    }

    let (grid, empty) = match view.display() {
      GridDisplay::Cards => (self.config.grid_display.as_str(), "none"),
      GridDisplay::EmptyState => ("none", self.config.empty_display.as_str()),
    };
    set_display(&self.grid, grid);
    if let Some(empty_state) = &self.empty_state {
      set_display(empty_state, empty);
    }

    for (index, pill) in self.pills.iter().enumerate() {
      toggle_class(
        pill,
        &self.config.active_class,
        self.filter.active_pill() == Some(index),
      );
    }

    if let Some(search) = &self.search {
      set_attr(search, "value", &self.raw_query);
    }
  }

  #[must_use]
  pub const fn filter(&self) -> &CatalogFilter {
    &self.filter
  }

  #[must_use]
  pub fn cards(&self) -> &[DocumentCard] {
    self.filter.cards()
  }

  #[must_use]
  pub fn to_html(&self) -> String {
    to_html(&self.document)
  }
}

fn read_card(node: &NodeRef) -> Option<DocumentCard> {
  let category = attr(node, "data-category").filter(|c| !c.is_empty())?;
  let field = |name: &str| attr(node, name).unwrap_or_default();
  Some(DocumentCard {
    id: field("data-id"),
    category,
    title: field("data-title"),
    description: field("data-description"),
    tags: field("data-tags"),
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;
  use crate::{catalog::KeyInput, dom::display};

  const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div id="categoryFilters">
  <button class="filter-pill active" data-category="All">All</button>
  <button class="filter-pill" data-category="Guides">Guides</button>
  <button class="filter-pill" data-category="API">API</button>
</div>
<input id="searchInput" type="text">
<div id="docsGrid">
  <div class="doc-card" data-id="intro" data-category="Guides"
       data-title="Introduction" data-description="Start here"
       data-tags="beginner,setup">Introduction</div>
  <div class="doc-card" data-id="auth" data-category="API"
       data-title="Auth API" data-description="Tokens"
       data-tags="authentication,security">Auth</div>
  <div class="doc-card" data-id="deploy" data-category="Guides"
       data-title="Deploying" data-description="Ship it"
       data-tags="ops,setup">Deploying</div>
</div>
<div id="noResults" style="display: none">Nothing found</div>
</body></html>"#;

  fn load(html: &str) -> CatalogPage {
    CatalogPage::load(html, &CatalogConfig::default())
      .unwrap()
      .unwrap()
  }

  fn card_displays(page: &CatalogPage) -> Vec<String> {
    page.cards.iter().map(|card| display(card).unwrap()).collect()
  }

  #[test]
  fn test_initial_pass_shows_all_cards() {
    let page = load(PAGE);
    assert_eq!(card_displays(&page), ["flex", "flex", "flex"]);
    assert_eq!(display(&page.grid).as_deref(), Some("grid"));
    assert_eq!(
      display(page.empty_state.as_ref().unwrap()).as_deref(),
      Some("none")
    );
  }

  #[test]
  fn test_category_event_updates_cards_and_pills() {
    let mut page = load(PAGE);
    page.handle(FilterEvent::CategorySelected("Guides".to_string()));
    assert_eq!(card_displays(&page), ["flex", "none", "flex"]);
    assert!(has_class(&page.pills[1], "active"));
    assert!(!has_class(&page.pills[0], "active"));
  }

  #[test]
  fn test_no_match_toggles_empty_state() {
    let mut page = load(PAGE);
    page.handle(FilterEvent::QueryChanged("Kubernetes".to_string()));
    assert_eq!(display(&page.grid).as_deref(), Some("none"));
    assert_eq!(
      display(page.empty_state.as_ref().unwrap()).as_deref(),
      Some("block")
    );
    assert!(page.to_html().contains(r#"value="Kubernetes""#));
  }

  #[test]
  fn test_initial_state_read_from_markup() {
    let html = PAGE
      .replace(r#"class="filter-pill active""#, r#"class="filter-pill""#)
      .replace(
        r#"class="filter-pill" data-category="API""#,
        r#"class="filter-pill active" data-category="API""#,
      )
      .replace(r#"type="text""#, r#"type="text" value="TOKENS""#);
    let page = load(&html);
    assert_eq!(page.filter().state().selected_category(), "API");
    assert_eq!(page.filter().state().search_query(), "tokens");
    assert_eq!(card_displays(&page), ["none", "flex", "none"]);
  }

  #[test]
  fn test_missing_grid_disables_catalog() {
    let page =
      CatalogPage::load("<p>no grid</p>", &CatalogConfig::default()).unwrap();
    assert!(page.is_none());
  }

  #[test]
  fn test_card_without_category_stays_hidden() {
    let html = PAGE.replace(
      r#"data-id="auth" data-category="API""#,
      r#"data-id="auth""#,
    );
    let mut page = load(&html);
    assert_eq!(page.cards().len(), 2);
    assert_eq!(display(&page.skipped[0]).as_deref(), Some("none"));

    page.handle(FilterEvent::QueryChanged("auth".to_string()));
    assert_eq!(page.filter().view().visible_count(), 0);
    assert_eq!(display(&page.skipped[0]).as_deref(), Some("none"));
  }

  #[test]
  fn test_hidden_cards_cannot_be_activated() {
    let mut page = load(PAGE);
    assert_eq!(
      page.activate_card(1, CardInput::Key(KeyInput::Enter)),
      Some(Navigation {
        href: "/docs/auth".to_string(),
      })
    );
    page.handle(FilterEvent::CategorySelected("Guides".to_string()));
    assert_eq!(page.activate_card(1, CardInput::Click), None);
  }
}
