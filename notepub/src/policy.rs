//! Publish policy: may a given note appear in public output?
use notepub_config::SiteConfig;

use crate::engine::{NoteProps, Vault, Visibility};

/// Decides whether a note may be exposed publicly.
///
/// Called once per link, so implementations should be cheap. Any
/// `Fn(&NoteProps, &SiteConfig, &[Vault]) -> bool` closure is a policy.
pub trait PublishPolicy: Send + Sync {
  fn can_publish(
    &self,
    note: &NoteProps,
    config: &SiteConfig,
    vaults: &[Vault],
  ) -> bool;
}

impl<F> PublishPolicy for F
where
  F: Fn(&NoteProps, &SiteConfig, &[Vault]) -> bool + Send + Sync,
{
  fn can_publish(
    &self,
    note: &NoteProps,
    config: &SiteConfig,
    vaults: &[Vault],
  ) -> bool {
    self(note, config, vaults)
  }
}

/// Policy driven by the declarative [`SiteConfig`].
///
/// In order:
///
/// 1. notes in a private vault are never published,
/// 2. notes outside the site hierarchies are not published,
/// 3. an explicit `published` front-matter flag decides,
/// 4. otherwise the hierarchy's `publish_by_default` decides.
#[derive(Debug, Clone, Copy, Default)]
pub struct SitePolicy;

impl PublishPolicy for SitePolicy {
  fn can_publish(
    &self,
    note: &NoteProps,
    config: &SiteConfig,
    vaults: &[Vault],
  ) -> bool {
    let private = vaults
      .iter()
      .find(|v| v.same_as(&note.vault))
      .unwrap_or(&note.vault)
      .visibility
      == Visibility::Private;
    if private {
      log::trace!("{} is in private vault {}", note.fname, note.vault.fs_path);
      return false;
    }

    let domain = note.domain();
    if !config.includes_hierarchy(domain) {
      log::trace!("{} is outside the site hierarchies", note.fname);
      return false;
    }

    note
      .published()
      .unwrap_or_else(|| config.hierarchy_config(domain).publish_by_default)
  }
}

#[cfg(test)]
mod tests {
  use notepub_config::HierarchyConfig;
  use serde_json::json;

  use super::*;

  fn note(fname: &str, vault: &Vault) -> NoteProps {
    NoteProps::new(fname, fname, vault.clone())
  }

  #[test]
  fn test_site_hierarchies_gate_publishing() {
    let vault = Vault::new("v1");
    let config = SiteConfig::with_hierarchies(["foo"]);
    let vaults = [vault.clone()];

    assert!(SitePolicy.can_publish(&note("foo", &vault), &config, &vaults));
    assert!(SitePolicy.can_publish(&note("foo.ch1", &vault), &config, &vaults));
    assert!(!SitePolicy.can_publish(&note("bar", &vault), &config, &vaults));
  }

  #[test]
  fn test_private_vault_is_never_published() {
    let public = Vault::new("v1");
    let config = SiteConfig::default();

    // The engine's vault list is authoritative for visibility.
    let vaults = [public.clone().private()];
    assert!(!SitePolicy.can_publish(&note("foo", &public), &config, &vaults));
    assert!(SitePolicy.can_publish(&note("foo", &public), &config, &[]));
  }

  #[test]
  fn test_front_matter_flag_wins_over_hierarchy_default() {
    let vault = Vault::new("v1");
    let mut config = SiteConfig::with_hierarchies(["foo"]);
    config.config.insert("foo".to_string(), HierarchyConfig {
      publish_by_default: false,
    });
    let vaults = [vault.clone()];

    let plain = note("foo.a", &vault);
    let opted_in = note("foo.b", &vault).with_custom("published", json!(true));
    let opted_out = note("foo.c", &vault).with_custom("published", json!(false));

    assert!(!SitePolicy.can_publish(&plain, &config, &vaults));
    assert!(SitePolicy.can_publish(&opted_in, &config, &vaults));

    config.config.clear();
    assert!(SitePolicy.can_publish(&plain, &config, &vaults));
    assert!(!SitePolicy.can_publish(&opted_out, &config, &vaults));
  }

  #[test]
  fn test_closure_policy() {
    let vault = Vault::new("v1");
    let deny_all = |_: &NoteProps, _: &SiteConfig, _: &[Vault]| false;
    assert!(!deny_all.can_publish(
      &note("foo", &vault),
      &SiteConfig::default(),
      &[]
    ));
  }
}
