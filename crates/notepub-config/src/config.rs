use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, options::PublishOptions, site::SiteConfig};

/// Top-level configuration file for notepub.
///
/// ```toml
/// [publish]
/// enforce_publish_policy = true
///
/// [publish.wiki_links]
/// use_id = true
///
/// [site]
/// site_hierarchies = ["foo"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Pipeline options.
  pub publish: PublishOptions,

  /// Site publishing policy. Without it every link to a note is treated as
  /// unpublishable when the policy is enforced.
  pub site: Option<SiteConfig>,
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    let config: Self = match extension.as_deref() {
      Some("json") => serde_json::from_str(&fs::read_to_string(path)?)?,
      Some("toml") => toml::from_str(&fs::read_to_string(path)?)?,
      Some(_) => {
        return Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )));
      },
      None => {
        return Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )));
      },
    };

    log::debug!("Loaded configuration from {}", path.display());
    config.validate()?;
    Ok(config)
  }

  /// Parse configuration from a TOML string.
  ///
  /// # Errors
  ///
  /// Returns an error if the string is not valid TOML for this schema or the
  /// site config fails validation.
  pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Load and merge several configuration files; later files win.
  ///
  /// # Errors
  ///
  /// Returns the first error encountered while loading a file.
  pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
    let mut config = Self::default();
    for path in paths {
      let next = Self::from_file(path)?;
      config.merge(next);
    }
    Ok(config)
  }

  /// Merge `other` into `self`. The publish options are replaced wholesale,
  /// the site config only when `other` has one.
  pub fn merge(&mut self, other: Self) {
    self.publish = other.publish;
    if other.site.is_some() {
      self.site = other.site;
    }
  }

  /// Validate the configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if the site config is invalid.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if let Some(site) = &self.site {
      site.validate()?;
    }
    if self.publish.enforce_publish_policy && self.site.is_none() {
      log::warn!(
        "Publish policy enforcement is enabled without a [site] section; \
         every note link will be redirected to the forbidden page"
      );
    }
    Ok(())
  }
}
