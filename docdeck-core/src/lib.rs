//! Interactive behaviour for static documentation sites.
//!
//! - [`catalog`]: category and free-text filtering of document cards.
//! - [`toc`]: heading ids, table of contents and scroll spy.
//! - [`dom`]: bindings that read those inputs from page markup and write the
//!   resulting state back.
//! - [`share`] and [`clipboard`]: share links and copy feedback.
//!
//! Everything is single-threaded and event driven: controllers take
//! `&mut self`, reduce one event at a time and return plain values for the
//! host to act on.
pub mod catalog;
pub mod clipboard;
pub mod dom;
pub mod error;
pub mod share;
pub mod toc;
pub mod utils;

pub use error::{CoreError, CoreResult};
