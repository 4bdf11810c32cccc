//! Configuration types for notepub.
//!
//! Two concerns live here: the declarative [`SiteConfig`] that the publish
//! policy consults, and the [`PublishOptions`] that drive the transformation
//! pipeline (with per-call [`PublishOverrides`] on top).
pub mod config;
pub mod error;
pub mod options;
pub mod site;

pub use config::Config;
pub use error::ConfigError;
pub use options::{
  EffectiveOptions,
  PublishOptions,
  PublishOptionsBuilder,
  PublishOverrides,
  TieBreak,
  WikiLinkOptions,
};
pub use site::{HierarchyConfig, SiteConfig};
