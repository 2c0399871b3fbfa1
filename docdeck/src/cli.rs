use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for docdeck
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "docdeck: catalog filtering and tables of contents for doc sites"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the docdeck CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new docdeck configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "docdeck.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Apply a category and search filter to a catalog page.
  Filter {
    /// Catalog page to filter.
    page: PathBuf,

    /// Category to select, as named by a pill's data-category.
    #[arg(short = 'C', long)]
    category: Option<String>,

    /// Search text; matched case-insensitively against title, description
    /// and tags.
    #[arg(short, long)]
    query: Option<String>,

    /// List the visible cards instead of writing the filtered page.
    #[arg(short, long)]
    list: bool,

    /// List the categories found on the cards instead of filtering.
    #[arg(long, conflicts_with_all = ["category", "query", "list"])]
    categories: bool,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Assign heading ids and build the table of contents of a document page.
  Toc {
    /// Document page to process.
    page: PathBuf,

    /// Location fragment to resolve, e.g. `#usage`. The matching entry is
    /// marked active.
    #[arg(long)]
    fragment: Option<String>,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Replay scroll positions over a document page and print the active TOC
  /// entry after every frame.
  Spy {
    /// Document page to process.
    page: PathBuf,

    /// JSON file with the viewport height, heading boxes and scroll offsets.
    #[arg(short, long, required = true)]
    layout: PathBuf,
  },

  /// Print share links for a page.
  Share {
    /// URL of the page to share.
    url: String,

    /// Page title, used by providers that accept one.
    #[arg(short = 'T', long)]
    title: String,

    /// Provider to generate a link for (can be specified multiple times).
    /// Defaults to the configured providers.
    #[arg(short, long, action = clap::ArgAction::Append)]
    provider: Vec<String>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
