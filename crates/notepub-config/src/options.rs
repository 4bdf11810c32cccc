//! Options for the publish pipeline.
//!
//! [`PublishOptions`] are configured once per processor. [`PublishOverrides`]
//! travel with a single document and win over the processor options, which in
//! turn win over the few fields the [`SiteConfig`] can also provide. The
//! merged view is [`EffectiveOptions`].
//!
//! # Examples
//!
//! ```
//! use notepub_config::{PublishOptionsBuilder, PublishOverrides};
//!
//! let options = PublishOptionsBuilder::new()
//!   .enforce_publish_policy(true)
//!   .use_id(true)
//!   .build();
//!
//! let overrides = PublishOverrides {
//!   insert_title: Some(true),
//!   ..Default::default()
//! };
//!
//! let effective = options.resolve(Some(&overrides), None);
//! assert!(effective.insert_title);
//! assert!(effective.use_id);
//! ```
use serde::{Deserialize, Serialize};

use crate::site::SiteConfig;

/// Options for configuring the publish pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct PublishOptions {
  /// Insert the note title as a level 1 heading.
  pub insert_title: bool,

  /// Redirect links to notes the site policy does not publish to the
  /// forbidden page.
  pub enforce_publish_policy: bool,

  /// Prefix prepended to image URLs for HTML output.
  pub assets_prefix: Option<String>,

  /// Wrap expanded note references in a decorated container.
  pub pretty_refs: bool,

  /// Wiki-link specific options.
  pub wiki_links: WikiLinkOptions,

  /// How to pick a note when a link matches several.
  pub tie_break: TieBreak,
}

/// Options for wiki-link rewriting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiLinkOptions {
  /// Link to the note's stable id instead of its fname.
  pub use_id: bool,

  /// Prefix prepended verbatim to every link href.
  pub prefix: Option<String>,
}

/// Tie-break rule for links matching notes in several vaults.
///
/// Matches in the vault of the document being processed always win; the rule
/// only applies when that does not settle it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
  /// Take the candidate whose vault comes first in the engine's vault list.
  #[default]
  VaultOrder,
  /// Refuse to pick and report the link as ambiguous.
  Reject,
}

/// Per-document overrides of [`PublishOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishOverrides {
  pub insert_title:           Option<bool>,
  pub enforce_publish_policy: Option<bool>,
  pub use_id:                 Option<bool>,
  pub assets_prefix:          Option<String>,
}

/// Options after applying overrides and site defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct EffectiveOptions {
  pub insert_title:           bool,
  pub enforce_publish_policy: bool,
  pub use_id:                 bool,
  pub link_prefix:            String,
  pub assets_prefix:          Option<String>,
  pub pretty_refs:            bool,
  pub tie_break:              TieBreak,
}

impl PublishOptions {
  /// Merge these options with per-document overrides and site defaults.
  #[must_use]
  pub fn resolve(
    &self,
    overrides: Option<&PublishOverrides>,
    site: Option<&SiteConfig>,
  ) -> EffectiveOptions {
    let overrides = overrides.cloned().unwrap_or_default();

    let assets_prefix = overrides
      .assets_prefix
      .or_else(|| self.assets_prefix.clone())
      .or_else(|| site.and_then(|s| s.assets_prefix.clone()))
      .filter(|prefix| !prefix.is_empty());

    EffectiveOptions {
      insert_title: overrides.insert_title.unwrap_or(self.insert_title),
      enforce_publish_policy: overrides
        .enforce_publish_policy
        .unwrap_or(self.enforce_publish_policy),
      use_id: overrides.use_id.unwrap_or(self.wiki_links.use_id),
      link_prefix: self.wiki_links.prefix.clone().unwrap_or_default(),
      assets_prefix,
      pretty_refs: self.pretty_refs
        || site.and_then(|s| s.use_pretty_refs).unwrap_or(false),
      tie_break: self.tie_break,
    }
  }
}

/// Builder for constructing `PublishOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct PublishOptionsBuilder {
  options: PublishOptions,
}

impl PublishOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable title insertion.
  #[must_use]
  pub const fn insert_title(mut self, enabled: bool) -> Self {
    self.options.insert_title = enabled;
    self
  }

  /// Enable or disable redirecting unpublishable links.
  #[must_use]
  pub const fn enforce_publish_policy(mut self, enabled: bool) -> Self {
    self.options.enforce_publish_policy = enabled;
    self
  }

  /// Set the asset URL prefix.
  #[must_use]
  pub fn assets_prefix<S: Into<String>>(mut self, prefix: Option<S>) -> Self {
    self.options.assets_prefix = prefix.map(Into::into);
    self
  }

  /// Enable or disable decorated note references.
  #[must_use]
  pub const fn pretty_refs(mut self, enabled: bool) -> Self {
    self.options.pretty_refs = enabled;
    self
  }

  /// Link to stable note ids instead of fnames.
  #[must_use]
  pub const fn use_id(mut self, enabled: bool) -> Self {
    self.options.wiki_links.use_id = enabled;
    self
  }

  /// Set the link href prefix.
  #[must_use]
  pub fn link_prefix<S: Into<String>>(mut self, prefix: Option<S>) -> Self {
    self.options.wiki_links.prefix = prefix.map(Into::into);
    self
  }

  /// Set the ambiguous-link tie-break rule.
  #[must_use]
  pub const fn tie_break(mut self, tie_break: TieBreak) -> Self {
    self.options.tie_break = tie_break;
    self
  }

  /// Build the final `PublishOptions`.
  #[must_use]
  pub fn build(self) -> PublishOptions {
    self.options
  }
}
