//! Per-call types of the publish pipeline.
use notepub_config::{PublishOverrides, SiteConfig};
use serde::{Deserialize, Serialize};

use crate::{ast::Document, engine::Vault, error::ErrorSink};

/// Output flavor the document is being prepared for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
  /// Published HTML site.
  #[default]
  Html,
  /// Plain markdown export.
  Markdown,
  /// Markdown keeping note syntax.
  DendronMarkdown,
  /// Live editor preview. Links and references are left untouched.
  Preview,
}

impl Destination {
  /// Whether links and note references are rewritten for this destination.
  #[must_use]
  pub const fn rewrites_links(self) -> bool {
    !matches!(self, Self::Preview)
  }

  /// Whether image URLs are prefixed for this destination.
  #[must_use]
  pub const fn rewrites_assets(self) -> bool {
    matches!(self, Self::Html)
  }
}

/// Everything the pipeline needs to know about the document being processed.
#[derive(Debug, Clone, Default)]
pub struct DocumentContext<'a> {
  pub dest:      Destination,
  /// Vault the document belongs to.
  pub vault:     Option<Vault>,
  /// Fname of the document's note.
  pub fname:     Option<String>,
  pub config:    Option<&'a SiteConfig>,
  pub overrides: Option<PublishOverrides>,
}

impl<'a> DocumentContext<'a> {
  #[must_use]
  pub fn new(dest: Destination) -> Self {
    Self {
      dest,
      ..Self::default()
    }
  }

  /// Context for the note `fname` stored in `vault`.
  #[must_use]
  pub fn for_note(dest: Destination, fname: impl Into<String>, vault: Vault) -> Self {
    Self {
      dest,
      vault: Some(vault),
      fname: Some(fname.into()),
      ..Self::default()
    }
  }

  #[must_use]
  pub const fn with_config(mut self, config: &'a SiteConfig) -> Self {
    self.config = Some(config);
    self
  }

  #[must_use]
  pub fn with_overrides(mut self, overrides: PublishOverrides) -> Self {
    self.overrides = Some(overrides);
    self
  }

  /// Context for a note pulled in by a note reference: same destination,
  /// site config and overrides, but the referenced note's identity.
  #[must_use]
  pub(crate) fn for_transclusion(&self, fname: &str, vault: &Vault) -> Self {
    Self {
      dest:      self.dest,
      vault:     Some(vault.clone()),
      fname:     Some(fname.to_string()),
      config:    self.config,
      overrides: self.overrides.clone(),
    }
  }
}

/// A processed document with the per-node errors collected on the way.
#[derive(Debug, Clone)]
pub struct Published {
  pub document: Document,
  pub errors:   ErrorSink,
}

/// A heading of a rendered document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
  /// Heading text without markup.
  pub text:  String,
  /// Heading level (1-6).
  pub level: u8,
  /// Anchor id the renderer gives the heading.
  pub id:    String,
}

/// Rendered HTML with the per-node errors collected on the way.
#[derive(Debug, Clone)]
pub struct RenderedNote {
  pub html:    String,
  /// Headings, transcluded ones included.
  pub headers: Vec<Header>,
  /// Text of the first level-1 heading, if any.
  pub title:   Option<String>,
  pub errors:  ErrorSink,
}
