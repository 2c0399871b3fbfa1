//! Page bindings over a parsed HTML document.
//!
//! The bindings read their inputs from the markup once, then project the
//! state of their controllers back onto it. Everything here works on
//! kuchikikiki's `NodeRef`; the helpers below keep selector errors and
//! attribute plumbing in one place.
mod catalog;
mod document;

pub use catalog::CatalogPage;
pub use document::{DocumentPage, TocOutcome};
use kuchikikiki::{Attribute, ExpandedName, NodeRef, parse_html};
use log::error;
use markup5ever::{LocalName, QualName, local_name, ns};
use tendril::TendrilSink;

use crate::error::{CoreError, CoreResult};

/// Parse a full HTML document.
#[must_use]
pub fn parse(html: &str) -> NodeRef {
  parse_html().one(html)
}

/// Serialize a document (or any subtree) back to HTML.
#[must_use]
pub fn to_html(node: &NodeRef) -> String {
  let mut buf = Vec::new();
  if let Err(e) = node.serialize(&mut buf) {
    error!("Failed to serialize document: {e}");
  }
  String::from_utf8(buf).unwrap_or_default()
}

/// All elements under `root` matching `selector`, in document order.
///
/// # Errors
///
/// Returns [`CoreError::Selector`] if `selector` does not parse.
pub fn select_all(root: &NodeRef, selector: &str) -> CoreResult<Vec<NodeRef>> {
  let matches = root
    .select(selector)
    .map_err(|()| CoreError::Selector(selector.to_string()))?;
  Ok(matches.map(|element| element.as_node().clone()).collect())
}

/// First element under `root` matching `selector`, if any.
///
/// # Errors
///
/// Returns [`CoreError::Selector`] if `selector` does not parse.
pub fn select_first(
  root: &NodeRef,
  selector: &str,
) -> CoreResult<Option<NodeRef>> {
  let mut matches = root
    .select(selector)
    .map_err(|()| CoreError::Selector(selector.to_string()))?;
  Ok(matches.next().map(|element| element.as_node().clone()))
}

/// Attribute value of an element; `None` for missing attributes and
/// non-element nodes.
#[must_use]
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
  node.as_element().and_then(|element| {
    element.attributes.borrow().get(name).map(str::to_string)
  })
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
  if let Some(element) = node.as_element() {
    element
      .attributes
      .borrow_mut()
      .insert(LocalName::from(name), value.to_string());
  }
}

/// Local tag name of an element, e.g. `h2`.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
  node
    .as_element()
    .map(|element| element.name.local.as_ref().to_ascii_lowercase())
}

#[must_use]
pub fn has_class(node: &NodeRef, class: &str) -> bool {
  attr(node, "class")
    .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// Add or remove one class, keeping the other classes in order.
pub fn toggle_class(node: &NodeRef, class: &str, on: bool) {
  if node.as_element().is_none() || has_class(node, class) == on {
    return;
  }
  let existing = attr(node, "class").unwrap_or_default();
  let mut classes: Vec<&str> = existing
    .split_whitespace()
    .filter(|c| *c != class)
    .collect();
  if on {
    classes.push(class);
  }

  if classes.is_empty() {
    if let Some(element) = node.as_element() {
      element.attributes.borrow_mut().remove(local_name!("class"));
    }
  } else {
    set_attr(node, "class", &classes.join(" "));
  }
}

/// Set the inline `display` property, leaving other declarations alone.
pub fn set_display(node: &NodeRef, display: &str) {
  let style = attr(node, "style").unwrap_or_default();
  let mut declarations: Vec<String> = style
    .split(';')
    .map(str::trim)
    .filter(|decl| !decl.is_empty())
    .filter(|decl| {
      decl.split_once(':').is_none_or(|(property, _)| {
        !property.trim().eq_ignore_ascii_case("display")
      })
    })
    .map(str::to_string)
    .collect();
  declarations.push(format!("display: {display}"));
  set_attr(node, "style", &declarations.join("; "));
}

/// The inline `display` value, if one is set.
#[must_use]
pub fn display(node: &NodeRef) -> Option<String> {
  attr(node, "style")?.split(';').find_map(|decl| {
    let (property, value) = decl.split_once(':')?;
    property
      .trim()
      .eq_ignore_ascii_case("display")
      .then(|| value.trim().to_string())
  })
}

/// Build a detached HTML element with the given attributes.
#[must_use]
pub fn new_element(tag: &str, attributes: &[(&str, &str)]) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), LocalName::from(tag)),
    attributes.iter().map(|(name, value)| {
      (ExpandedName::new("", *name), Attribute {
        prefix: None,
        value:  (*value).to_string(),
      })
    }),
  )
}

/// Replace all children of `node` with a single text node.
pub fn set_text(node: &NodeRef, text: &str) {
  clear_children(node);
  node.append(NodeRef::new_text(text));
}

pub fn clear_children(node: &NodeRef) {
  let children: Vec<NodeRef> = node.children().collect();
  for child in children {
    child.detach();
  }
}
