//! Expose docdeck's command layer for use in integration tests and benches.
pub mod cli;
pub mod commands;
pub mod error;
