//! Subcommand implementations.
//!
//! Each command takes page markup and configuration and returns the text to
//! write out, so the binary only deals with files and the terminal.
use std::fmt::Write as _;

use docdeck_config::{
  catalog::CatalogConfig,
  spy::SpyConfig,
  toc::TocConfig,
};
use docdeck_core::{
  catalog::{FilterEvent, categories as card_categories},
  dom::{CatalogPage, DocumentPage},
  share::{ShareLink, ShareProvider, share_links},
  toc::{BandWatcher, PageLayout, TocEffect, VisibilityBand},
};
use log::{info, warn};

use crate::error::DocdeckError;

/// Filter a catalog page.
///
/// Returns the filtered page, or with `list` one `id<TAB>category<TAB>title`
/// line per visible card. Pages without a card grid are passed through.
///
/// # Errors
///
/// Returns an error if a configured selector is invalid.
pub fn filter(
  html: &str,
  config: &CatalogConfig,
  category: Option<&str>,
  query: Option<&str>,
  list: bool,
) -> Result<String, DocdeckError> {
  let Some(mut page) = CatalogPage::load(html, config)? else {
    warn!("No card grid matching '{}' found", config.grid_selector);
    return Ok(if list { String::new() } else { html.to_string() });
  };

  if let Some(category) = category {
    page.handle(FilterEvent::CategorySelected(category.to_string()));
  }
  if let Some(query) = query {
    page.handle(FilterEvent::QueryChanged(query.to_string()));
  }

  let view = page.filter().view();
  info!(
    "{} of {} cards visible",
    view.visible_count(),
    page.cards().len()
  );

  if !list {
    return Ok(page.to_html());
  }

  let mut out = String::new();
  for card in page.filter().visible_cards() {
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}\t{}\t{}", card.id, card.category, card.title);
  }
  Ok(out)
}

/// Categories of a catalog page, one per line: the "all" category first,
/// then each card category in the order cards appear.
///
/// Pages without a card grid produce no output.
///
/// # Errors
///
/// Returns an error if a configured selector is invalid.
pub fn categories(
  html: &str,
  config: &CatalogConfig,
) -> Result<String, DocdeckError> {
  let Some(page) = CatalogPage::load(html, config)? else {
    warn!("No card grid matching '{}' found", config.grid_selector);
    return Ok(String::new());
  };

  let mut out = String::new();
  for category in card_categories(page.cards(), &config.all_category) {
    let _ = writeln!(out, "{category}");
  }
  Ok(out)
}

/// Build the table of contents of a document page and return the page.
///
/// A `fragment` naming an entry marks that entry active, as the initial
/// location hash does in a browser.
///
/// # Errors
///
/// Returns an error if a configured selector is invalid.
pub fn toc(
  html: &str,
  config: &TocConfig,
  fragment: Option<&str>,
) -> Result<String, DocdeckError> {
  let mut page = DocumentPage::load(html, config)?;
  info!("Table of contents: {:?}", page.outcome());

  if let Some(fragment) = fragment {
    match page.resolve_fragment(fragment) {
      Some(TocEffect::ScrollIntoView { id, delay_ms, .. }) => {
        info!("Fragment resolves to '{id}', scroll after {delay_ms}ms");
      },
      _ => warn!("Fragment '{fragment}' names no TOC entry"),
    }
  }

  Ok(page.to_html())
}

/// Replay `layout` over a document page and return the active entry id after
/// every frame, one per line.
///
/// Pages without TOC entries produce no output.
///
/// # Errors
///
/// Returns an error if a configured selector is invalid.
pub fn spy(
  html: &str,
  toc: &TocConfig,
  spy: &SpyConfig,
  layout: PageLayout,
) -> Result<String, DocdeckError> {
  let mut page = DocumentPage::load(html, toc)?;
  let outcome = page.outcome();
  let Some(controller) = page.controller_mut() else {
    warn!("No table of contents to follow ({outcome:?})");
    return Ok(String::new());
  };

  let mut watcher = BandWatcher::new(layout, VisibilityBand::from(spy));
  let active: Vec<usize> = controller.follow(&mut watcher).collect();

  let mut out = String::new();
  for index in active {
    if let Some(entry) = controller.entries().get(index) {
      let _ = writeln!(out, "{}", entry.id);
    }
  }
  Ok(out)
}

/// Parse a layout file.
///
/// # Errors
///
/// Returns an error if `json` is not a valid layout.
pub fn parse_layout(json: &str) -> Result<PageLayout, DocdeckError> {
  Ok(serde_json::from_str(json)?)
}

/// Share links for `url`, one `provider<TAB>url` line each.
///
/// Explicit `providers` must all be known; otherwise the configured
/// providers are used and unknown names among them are skipped.
///
/// # Errors
///
/// Returns an error if an explicitly requested provider is unknown.
pub fn share(
  url: &str,
  title: &str,
  providers: &[String],
  configured: &[String],
) -> Result<String, DocdeckError> {
  let links: Vec<ShareLink> = if providers.is_empty() {
    share_links(configured, url, title)
  } else {
    providers
      .iter()
      .map(|name| -> Result<ShareLink, DocdeckError> {
        let provider: ShareProvider = name.parse()?;
        Ok(ShareLink {
          provider,
          url: provider.share_url(url, title),
        })
      })
      .collect::<Result<_, _>>()?
  };

  let mut out = String::new();
  for link in links {
    let _ = writeln!(out, "{}\t{}", link.provider, link.url);
  }
  Ok(out)
}
