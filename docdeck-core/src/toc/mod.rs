//! Table of contents generation and scroll synchronization.
//!
//! Headings are collected once per page load, given page-unique anchor ids
//! ([`assign_ids`]) and turned into [`TocEntry`] links. A [`TocController`]
//! then owns the entry list together with a [`ScrollSpy`] that keeps exactly
//! one entry active while the reader scrolls or clicks.
mod controller;
mod outline;
mod spy;

pub use controller::{TocController, TocEffect, TocEvent};
pub use outline::{
  Heading,
  HeadingLevel,
  IdAllocator,
  RawHeading,
  TocEntry,
  assign_ids,
  entries,
};
pub use spy::{
  BandWatcher,
  HeadingBox,
  PageLayout,
  ScrollSpy,
  ViewportWatcher,
  VisibilityBand,
  VisibilityEvent,
};
