//! Symbolic note references.
//!
//! A [`NoteReference`] is what a wiki-link or note reference points at before
//! it is resolved against the note index:
//!
//! ```text
//! [[alias|dendron://vault/some.note#anchor]]
//! ![[some.note#start:#end]]
//! ((ref: [[some.note]]#start,1:#end))
//! ```
use std::fmt;

use thiserror::Error;

/// Scheme used for cross-vault links.
pub const VAULT_SCHEME: &str = "dendron://";

/// Errors produced while parsing a reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceParseError {
  #[error("note reference has no target")]
  Empty,

  #[error("malformed vault prefix in `{0}`")]
  MalformedVault(String),
}

/// Parsed, immutable target of a link or transclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NoteReference {
  /// Note fname, e.g. `foo.bar`.
  pub name:         String,
  /// Name of the vault the note lives in, when spelled out.
  pub vault:        Option<String>,
  /// Heading anchor. For links this is the `#fragment`, for transclusions
  /// the start of the included range.
  pub anchor_start: Option<String>,
  /// End of the included range; `*` means the end of the note.
  pub anchor_end:   Option<String>,
  /// Label to show instead of the name.
  pub alias:        Option<String>,
}

impl NoteReference {
  /// Reference to `name` with nothing else set.
  #[must_use]
  pub fn to_note(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Default::default()
    }
  }

  /// Parse the inside of a wiki-link: `alias|dendron://vault/name#anchor`.
  ///
  /// # Errors
  ///
  /// Returns an error if the target is empty or the vault prefix is
  /// malformed.
  pub fn parse_link(raw: &str) -> Result<Self, ReferenceParseError> {
    let (alias, target) = match raw.split_once('|') {
      Some((alias, target)) => (Some(alias.trim()), target.trim()),
      None => (None, raw.trim()),
    };

    let (vault, rest) = split_vault(target)?;
    let (name, anchor) = match rest.split_once('#') {
      Some((name, anchor)) => (name.trim(), Some(anchor.trim())),
      None => (rest.trim(), None),
    };

    if name.is_empty() {
      return Err(ReferenceParseError::Empty);
    }

    Ok(Self {
      name: name.to_string(),
      vault,
      anchor_start: anchor.filter(|a| !a.is_empty()).map(ToString::to_string),
      anchor_end: None,
      alias: alias.filter(|a| !a.is_empty()).map(ToString::to_string),
    })
  }

  /// Parse a note reference target: `dendron://vault/name#start:#end`.
  ///
  /// The legacy line offset (`#start,1`) is accepted and dropped.
  ///
  /// # Errors
  ///
  /// Returns an error if the target is empty or the vault prefix is
  /// malformed.
  pub fn parse_ref(raw: &str) -> Result<Self, ReferenceParseError> {
    let (alias, target) = match raw.split_once('|') {
      Some((alias, target)) => (Some(alias.trim()), target.trim()),
      None => (None, raw.trim()),
    };

    let (vault, rest) = split_vault(target)?;
    let (name, range) = match rest.split_once('#') {
      Some((name, range)) => (name.trim(), Some(range)),
      None => (rest.trim(), None),
    };

    if name.is_empty() {
      return Err(ReferenceParseError::Empty);
    }

    let (anchor_start, anchor_end) = range.map_or((None, None), parse_range);

    Ok(Self {
      name: name.to_string(),
      vault,
      anchor_start,
      anchor_end,
      alias: alias.filter(|a| !a.is_empty()).map(ToString::to_string),
    })
  }

  /// The `#fragment` of a link.
  #[must_use]
  pub fn anchor(&self) -> Option<&str> {
    self.anchor_start.as_deref()
  }

  /// Hierarchy prefix of a wildcard reference: `foo` for `foo.*`.
  #[must_use]
  pub fn wildcard_prefix(&self) -> Option<&str> {
    self.name.strip_suffix(".*")
  }

  /// Label to display for this reference when nothing else is known.
  #[must_use]
  pub fn label(&self) -> &str {
    self.alias.as_deref().unwrap_or(&self.name)
  }
}

/// Split an optional `dendron://vault/` prefix off a target.
fn split_vault(
  target: &str,
) -> Result<(Option<String>, &str), ReferenceParseError> {
  let Some(rest) = target.strip_prefix(VAULT_SCHEME) else {
    return Ok((None, target));
  };
  match rest.split_once('/') {
    Some((vault, name)) if !vault.trim().is_empty() => {
      Ok((Some(vault.trim().to_string()), name))
    },
    _ => Err(ReferenceParseError::MalformedVault(target.to_string())),
  }
}

/// Parse `start,offset:#end` (everything after the first `#`).
fn parse_range(range: &str) -> (Option<String>, Option<String>) {
  let (start, end) = match range.split_once(':') {
    Some((start, end)) => (start, Some(end)),
    None => (range, None),
  };

  let start = start.split(',').next().unwrap_or_default().trim();
  let end = end
    .map(|e| e.trim().trim_start_matches('#').trim())
    .filter(|e| !e.is_empty());

  (
    Some(start).filter(|s| !s.is_empty()).map(ToString::to_string),
    end.map(ToString::to_string),
  )
}

impl fmt::Display for NoteReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(alias) = &self.alias {
      write!(f, "{alias}|")?;
    }
    if let Some(vault) = &self.vault {
      write!(f, "{VAULT_SCHEME}{vault}/")?;
    }
    f.write_str(&self.name)?;
    if let Some(start) = &self.anchor_start {
      write!(f, "#{start}")?;
    }
    if let Some(end) = &self.anchor_end {
      if self.anchor_start.is_none() {
        f.write_str("#")?;
      }
      write!(f, ":#{end}")?;
    }
    Ok(())
  }
}
