use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Hierarchy name that opts every hierarchy into publishing.
pub const ROOT_HIERARCHY: &str = "root";

/// Declarative publishing policy for a site.
///
/// A note is a candidate for publishing when the first segment of its fname
/// (its *domain*, `foo` for `foo.bar.baz`) is listed in
/// [`site_hierarchies`](Self::site_hierarchies), or when that list contains
/// [`ROOT_HIERARCHY`]. Per-hierarchy settings in [`config`](Self::config)
/// decide what happens to notes that do not say anything about publishing
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
  /// Hierarchies that make up the published site.
  pub site_hierarchies: Vec<String>,

  /// Prefix prepended to asset URLs. Used when the publish options do not
  /// set one.
  pub assets_prefix: Option<String>,

  /// Render note references with the decorated "portal" wrapper.
  pub use_pretty_refs: Option<bool>,

  /// Per-hierarchy settings, keyed by domain. The [`ROOT_HIERARCHY`] entry
  /// applies to domains without their own entry.
  pub config: HashMap<String, HierarchyConfig>,
}

impl Default for SiteConfig {
  fn default() -> Self {
    Self {
      site_hierarchies: vec![ROOT_HIERARCHY.to_string()],
      assets_prefix:    None,
      use_pretty_refs:  None,
      config:           HashMap::new(),
    }
  }
}

/// Publishing settings for a single hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
  /// Whether notes without an explicit `published` flag are published.
  pub publish_by_default: bool,
}

impl Default for HierarchyConfig {
  fn default() -> Self {
    Self {
      publish_by_default: true,
    }
  }
}

impl SiteConfig {
  /// Create a config publishing exactly the given hierarchies.
  #[must_use]
  pub fn with_hierarchies<I, S>(hierarchies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      site_hierarchies: hierarchies.into_iter().map(Into::into).collect(),
      ..Default::default()
    }
  }

  /// Whether notes in `domain` are part of the site at all.
  #[must_use]
  pub fn includes_hierarchy(&self, domain: &str) -> bool {
    self
      .site_hierarchies
      .iter()
      .any(|h| h == ROOT_HIERARCHY || h == domain)
  }

  /// Settings for `domain`, falling back to the root entry and then to the
  /// defaults.
  #[must_use]
  pub fn hierarchy_config(&self, domain: &str) -> HierarchyConfig {
    self
      .config
      .get(domain)
      .or_else(|| self.config.get(ROOT_HIERARCHY))
      .copied()
      .unwrap_or_default()
  }

  /// Check the config for values the publish policy cannot work with.
  ///
  /// # Errors
  ///
  /// Returns an error if no hierarchy is published or a hierarchy name is
  /// blank or contains a `.`.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.site_hierarchies.is_empty() {
      return Err(ConfigError::Config(
        "site_hierarchies must name at least one hierarchy".to_string(),
      ));
    }
    for hierarchy in &self.site_hierarchies {
      if hierarchy.trim().is_empty() {
        return Err(ConfigError::Config(
          "site_hierarchies contains an empty hierarchy name".to_string(),
        ));
      }
      if hierarchy.contains('.') {
        return Err(ConfigError::Config(format!(
          "site hierarchy `{hierarchy}` must be a top-level domain, not a \
           nested hierarchy"
        )));
      }
    }
    Ok(())
  }
}
