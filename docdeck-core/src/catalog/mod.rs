//! Catalog filtering engine.
//!
//! A [`CatalogFilter`] owns the [`FilterState`] of one catalog page view and
//! reduces [`FilterEvent`]s into it. Each change produces a fresh
//! [`CatalogView`], a pure function of the state and the card collection,
//! which the page binding in [`crate::dom`] projects onto the markup.
mod card;
mod filter;

pub use card::{
  CardInput,
  DocumentCard,
  KeyInput,
  Navigation,
  activate,
  categories,
};
pub use filter::{
  CatalogFilter,
  CatalogView,
  FilterEvent,
  FilterState,
  GridDisplay,
  recompute,
};
