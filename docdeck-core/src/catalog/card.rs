//! Document cards and card activation.
use serde::{Deserialize, Serialize};

/// Read-only view of one card in the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCard {
  /// Opaque identifier of the full document.
  pub id:          String,
  /// Single category label, never empty.
  pub category:    String,
  pub title:       String,
  pub description: String,
  /// Raw, delimited keyword bag (e.g. `"authentication,security"`).
  pub tags:        String,
}

impl DocumentCard {
  /// Exact, case-sensitive category match. The `all` sentinel matches every
  /// card.
  #[must_use]
  pub fn matches_category(&self, selected: &str, all: &str) -> bool {
    selected == all || self.category == selected
  }

  /// Case-insensitive substring match over title, description and tags.
  ///
  /// `query` must already be lower-cased; an empty query matches every card.
  #[must_use]
  pub fn matches_query(&self, query: &str) -> bool {
    query.is_empty()
      || [&self.title, &self.description, &self.tags]
        .iter()
        .any(|field| field.to_lowercase().contains(query))
  }

  /// Location of the card's document page.
  #[must_use]
  pub fn href(&self, docs_base_path: &str) -> String {
    format!("{}/{}", docs_base_path.trim_end_matches('/'), self.id)
  }
}

/// Key pressed while a card has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
  Enter,
  Space,
  Other,
}

impl From<&str> for KeyInput {
  /// Maps DOM `KeyboardEvent.key` names.
  fn from(key: &str) -> Self {
    match key {
      "Enter" => Self::Enter,
      " " | "Space" | "Spacebar" => Self::Space,
      _ => Self::Other,
    }
  }
}

/// User input directed at a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardInput {
  Click,
  Key(KeyInput),
}

/// Navigation requested by activating a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
  pub href: String,
}

/// Resolve card input into a navigation.
///
/// Clicks, Enter and Space open the document; any other key is ignored.
#[must_use]
pub fn activate(
  card: &DocumentCard,
  input: CardInput,
  docs_base_path: &str,
) -> Option<Navigation> {
  match input {
    CardInput::Click
    | CardInput::Key(KeyInput::Enter | KeyInput::Space) => {
      Some(Navigation {
        href: card.href(docs_base_path),
      })
    },
    CardInput::Key(KeyInput::Other) => None,
  }
}

/// Category pill labels for a card set: the `all` sentinel followed by each
/// distinct category in first-seen order.
#[must_use]
pub fn categories(cards: &[DocumentCard], all: &str) -> Vec<String> {
  let mut categories = vec![all.to_string()];
  for card in cards {
    if !categories.contains(&card.category) {
      categories.push(card.category.clone());
    }
  }
  categories
}
