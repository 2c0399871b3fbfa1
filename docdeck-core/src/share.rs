//! Social share links.
use std::{fmt, str::FromStr};

use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Characters escaped in a URI component: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'!')
  .remove(b'~')
  .remove(b'*')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')');

fn encode_component(value: &str) -> String {
  utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareProvider {
  Twitter,
  LinkedIn,
  Facebook,
}

impl ShareProvider {
  pub const ALL: [Self; 3] = [Self::Twitter, Self::LinkedIn, Self::Facebook];

  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Twitter => "twitter",
      Self::LinkedIn => "linkedin",
      Self::Facebook => "facebook",
    }
  }

  /// Case-insensitive lookup; `None` for unknown platforms.
  #[must_use]
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|provider| provider.name().eq_ignore_ascii_case(name.trim()))
  }

  /// Share URL for a page. Only Twitter carries the title.
  #[must_use]
  pub fn share_url(self, page_url: &str, title: &str) -> String {
    let url = encode_component(page_url);
    match self {
      Self::Twitter => {
        format!(
          "https://twitter.com/intent/tweet?url={url}&text={}",
          encode_component(title)
        )
      },
      Self::LinkedIn => {
        format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")
      },
      Self::Facebook => {
        format!("https://www.facebook.com/sharer/sharer.php?u={url}")
      },
    }
  }
}

impl fmt::Display for ShareProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for ShareProvider {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_name(s).ok_or_else(|| CoreError::UnknownProvider(s.to_string()))
  }
}

/// A rendered share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
  pub provider: ShareProvider,
  pub url:      String,
}

/// Share links for every known provider in `providers`, in order. Unknown
/// names are skipped.
#[must_use]
pub fn share_links<S: AsRef<str>>(
  providers: &[S],
  page_url: &str,
  title: &str,
) -> Vec<ShareLink> {
  providers
    .iter()
    .filter_map(|name| {
      let provider = ShareProvider::from_name(name.as_ref());
      if provider.is_none() {
        debug!("Ignoring unknown share provider '{}'", name.as_ref());
      }
      provider
    })
    .map(|provider| {
      ShareLink {
        provider,
        url: provider.share_url(page_url, title),
      }
    })
    .collect()
}
