use docdeck_config::toc::TocConfig;
use kuchikikiki::NodeRef;
use log::{debug, info};

use super::{
  attr,
  clear_children,
  has_class,
  new_element,
  parse,
  select_all,
  select_first,
  set_attr,
  set_text,
  tag_name,
  to_html,
  toggle_class,
};
use crate::{
  clipboard::{Clipboard, CopyButton, Notice},
  error::CoreResult,
  toc::{
    HeadingLevel,
    RawHeading,
    TocController,
    TocEffect,
    TocEntry,
    TocEvent,
    assign_ids,
    entries,
  },
};

/// What the TOC builder did with the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocOutcome {
  /// Content region or navigation container missing; nothing was touched.
  Skipped,
  /// No headings: the placeholder was rendered and no spy installed.
  Placeholder,
  /// Navigation built with this many entries.
  Built(usize),
}

#[derive(Debug)]
struct CodeBlock {
  code:   NodeRef,
  button: NodeRef,
  state:  CopyButton,
}

/// Document page binding: heading ids, the TOC and code-block buttons.
#[derive(Debug)]
pub struct DocumentPage {
  document:    NodeRef,
  config:      TocConfig,
  outcome:     TocOutcome,
  links:       Vec<NodeRef>,
  controller:  Option<TocController>,
  code_blocks: Vec<CodeBlock>,
}

impl DocumentPage {
  /// Bind to a document page: assign heading ids, build the navigation and
  /// enhance code blocks.
  ///
  /// # Errors
  ///
  /// Returns an error if a configured selector is invalid.
  pub fn load(html: &str, config: &TocConfig) -> CoreResult<Self> {
    let document = parse(html);
    let content = select_first(&document, &config.content_selector)?;
    let nav = select_first(&document, &config.nav_selector)?;

    let mut page = Self {
      document,
      config: config.clone(),
      outcome: TocOutcome::Skipped,
      links: Vec::new(),
      controller: None,
      code_blocks: Vec::new(),
    };

    match (&content, &nav) {
      (Some(content), Some(nav)) => page.build_toc(content, nav)?,
      _ => {
        debug!(
          "Content region '{}' or navigation '{}' missing, TOC disabled",
          config.content_selector, config.nav_selector
        );
      },
    }

    if config.code_copy_buttons
      && let Some(content) = &content
    {
      page.enhance_code_blocks(content)?;
    }

    info!(
      "Document page initialized: {:?}, {} code blocks",
      page.outcome,
      page.code_blocks.len()
    );
    Ok(page)
  }

  fn build_toc(&mut self, content: &NodeRef, nav: &NodeRef) -> CoreResult<()> {
    let (nodes, raw): (Vec<NodeRef>, Vec<RawHeading>) =
      select_all(content, "h2, h3")?
        .into_iter()
        .filter_map(|node| {
          let level = HeadingLevel::from_tag(&tag_name(&node)?)?;
          let heading = RawHeading {
            level,
            text: node.text_contents(),
            id: attr(&node, "id"),
          };
          Some((node, heading))
        })
        .unzip();

    clear_children(nav);
    if raw.is_empty() {
      let placeholder = new_element("p", &[("class", "toc-empty")]);
      set_text(&placeholder, &self.config.placeholder_text);
      nav.append(placeholder);
      self.outcome = TocOutcome::Placeholder;
      return Ok(());
    }

    let headings = assign_ids(&raw);
    for (node, heading) in nodes.iter().zip(&headings) {
      set_attr(node, "id", &heading.id);
    }

    let entries = entries(&headings);
    for entry in &entries {
      let link = toc_link(entry);
      nav.append(link.clone());
      self.links.push(link);
    }

    self.outcome = TocOutcome::Built(entries.len());
    self.controller = TocController::new(entries);
    self.render_active();
    Ok(())
  }

  /// Append a copy button to every `pre > code` block in `content`.
  ///
  /// Blocks that already carry a button keep it.
  fn enhance_code_blocks(&mut self, content: &NodeRef) -> CoreResult<()> {
    for code in select_all(content, "pre > code")? {
      let Some(pre) = code.parent() else {
        continue;
      };
      let existing =
        pre.children().find(|child| has_class(child, "code-copy-btn"));
      let button = existing.unwrap_or_else(|| {
        let button = new_element("button", &[
          ("class", "code-copy-btn"),
          ("type", "button"),
        ]);
        pre.append(button.clone());
        button
      });

      let state = CopyButton::code_block(&self.config);
      set_text(&button, state.label());
      self.code_blocks.push(CodeBlock {
        code,
        button,
        state,
      });
    }
    Ok(())
  }

  #[must_use]
  pub const fn outcome(&self) -> TocOutcome {
    self.outcome
  }

  /// The TOC controller, present only once entries were built.
  #[must_use]
  pub const fn controller(&self) -> Option<&TocController> {
    self.controller.as_ref()
  }

  pub const fn controller_mut(&mut self) -> Option<&mut TocController> {
    self.controller.as_mut()
  }

  #[must_use]
  pub fn entries(&self) -> &[TocEntry] {
    self.controller.as_ref().map_or(&[][..], TocController::entries)
  }

  /// Id of the active entry.
  #[must_use]
  pub fn active_id(&self) -> Option<&str> {
    self
      .controller
      .as_ref()
      .map(|controller| controller.active_entry().id.as_str())
  }

  /// Reduce one TOC event, re-render and return the effects to perform.
  ///
  /// Without a controller (skipped or placeholder pages) events are no-ops.
  pub fn handle(&mut self, event: TocEvent) -> Vec<TocEffect> {
    let Some(controller) = self.controller.as_mut() else {
      return Vec::new();
    };
    let effects = controller.handle(event);
    self.render_active();
    effects
  }

  /// Scroll request for the location fragment present at page load.
  pub fn resolve_fragment(&mut self, fragment: &str) -> Option<TocEffect> {
    let delay = self.config.hash_scroll_delay_ms;
    let effect = self.controller.as_mut()?.resolve_fragment(fragment, delay);
    self.render_active();
    effect
  }

  /// Mark exactly the active link with the active class.
  pub fn render_active(&self) {
    let active = self.controller.as_ref().map(TocController::active);
    for (index, link) in self.links.iter().enumerate() {
      toggle_class(link, &self.config.active_class, active == Some(index));
    }
  }

  /// Text of every enhanced code block, in document order.
  #[must_use]
  pub fn code_texts(&self) -> Vec<String> {
    self
      .code_blocks
      .iter()
      .map(|block| block.code.text_contents())
      .collect()
  }

  /// Press the copy button of code block `index`.
  ///
  /// # Errors
  ///
  /// Passes on the button's failure notice, see [`CopyButton::press`].
  pub fn press_code_copy<C: Clipboard + ?Sized>(
    &mut self,
    index: usize,
    clipboard: &mut C,
    now_ms: u64,
  ) -> Result<(), Option<Notice>> {
    let Some(block) = self.code_blocks.get_mut(index) else {
      return Ok(());
    };
    let text = block.code.text_contents();
    let pressed = block.state.press(clipboard, &text, now_ms);
    set_text(&block.button, block.state.label());
    pressed
  }

  /// Advance host time, restoring copy button labels that are due.
  pub fn tick(&mut self, now_ms: u64) {
    for block in &mut self.code_blocks {
      if block.state.tick(now_ms) {
        set_text(&block.button, block.state.label());
      }
    }
  }

  #[must_use]
  pub fn to_html(&self) -> String {
    to_html(&self.document)
  }
}

fn toc_link(entry: &TocEntry) -> NodeRef {
  let level = entry.level.as_u8().to_string();
  let link = new_element("a", &[
    ("href", entry.href().as_str()),
    ("data-level", level.as_str()),
  ]);
  set_text(&link, &entry.text);
  link
}
