//! Note records and the lookup interface the pipeline resolves against.
//!
//! The pipeline never owns notes. It asks a [`NoteLookup`] for candidates by
//! fname and treats whatever comes back as read-only. [`NoteIndex`] is a
//! plain in-memory implementation, good enough for tests and for callers
//! that already hold all notes.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether a vault may be published at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
  #[default]
  Public,
  Private,
}

/// A storage root holding notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vault {
  /// Path of the vault relative to the workspace root. Identifies the vault.
  pub fs_path:    String,
  /// Display name used in `dendron://name/...` links.
  #[serde(default)]
  pub name:       Option<String>,
  #[serde(default)]
  pub visibility: Visibility,
}

impl Vault {
  #[must_use]
  pub fn new(fs_path: impl Into<String>) -> Self {
    Self {
      fs_path:    fs_path.into(),
      name:       None,
      visibility: Visibility::Public,
    }
  }

  #[must_use]
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  #[must_use]
  pub const fn private(mut self) -> Self {
    self.visibility = Visibility::Private;
    self
  }

  /// Name used to address the vault in links: the explicit name, or the
  /// last component of its path.
  #[must_use]
  pub fn name(&self) -> &str {
    self.name.as_deref().unwrap_or_else(|| {
      self
        .fs_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(&self.fs_path)
    })
  }

  /// Two vaults are the same vault when their paths match.
  #[must_use]
  pub fn same_as(&self, other: &Self) -> bool {
    self.fs_path == other.fs_path
  }
}

/// A note as stored by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteProps {
  /// Stable identifier, unaffected by renames.
  pub id:     String,
  pub title:  String,
  /// Dot-separated hierarchical name, e.g. `foo.bar`.
  pub fname:  String,
  pub vault:  Vault,
  /// Markdown body without front-matter.
  #[serde(default)]
  pub body:   String,
  /// Front-matter fields not modelled explicitly.
  #[serde(default)]
  pub custom: Map<String, Value>,
}

impl NoteProps {
  /// Create a note titled after the last segment of its fname.
  #[must_use]
  pub fn new(
    id: impl Into<String>,
    fname: impl Into<String>,
    vault: Vault,
  ) -> Self {
    let fname = fname.into();
    let title = title_from_fname(&fname);
    Self {
      id: id.into(),
      title,
      fname,
      vault,
      body: String::new(),
      custom: Map::new(),
    }
  }

  #[must_use]
  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = title.into();
    self
  }

  #[must_use]
  pub fn with_body(mut self, body: impl Into<String>) -> Self {
    self.body = body.into();
    self
  }

  #[must_use]
  pub fn with_custom(mut self, key: impl Into<String>, value: Value) -> Self {
    self.custom.insert(key.into(), value);
    self
  }

  /// First segment of the fname: `foo` for `foo.bar.baz`.
  #[must_use]
  pub fn domain(&self) -> &str {
    self.fname.split('.').next().unwrap_or(&self.fname)
  }

  /// Explicit `published` flag from front-matter, if any.
  #[must_use]
  pub fn published(&self) -> Option<bool> {
    self.custom.get("published").and_then(Value::as_bool)
  }
}

/// `foo.bar-baz` -> `Bar-baz`
fn title_from_fname(fname: &str) -> String {
  let last = fname.rsplit('.').next().unwrap_or(fname);
  let mut chars = last.chars();
  chars.next().map_or_else(String::new, |c| {
    c.to_uppercase().collect::<String>() + chars.as_str()
  })
}

/// Read-only access to the engine's notes.
///
/// Implementations are shared between documents processed in parallel, hence
/// the `Send + Sync` bound.
pub trait NoteLookup: Send + Sync {
  /// Notes whose fname equals `fname`, restricted to `vault` when given.
  fn notes_by_fname(
    &self,
    fname: &str,
    vault: Option<&Vault>,
  ) -> Vec<&NoteProps>;

  /// Notes strictly below the hierarchy `prefix` (`foo.*` matches `foo.bar`
  /// but not `foo`), restricted to `vault` when given.
  fn notes_by_prefix(
    &self,
    prefix: &str,
    vault: Option<&Vault>,
  ) -> Vec<&NoteProps>;

  /// All vaults, in the engine's canonical order.
  fn vaults(&self) -> &[Vault];
}

/// In-memory note index.
#[derive(Debug, Clone, Default)]
pub struct NoteIndex {
  vaults:   Vec<Vault>,
  notes:    Vec<NoteProps>,
  by_fname: HashMap<String, Vec<usize>>,
}

impl NoteIndex {
  #[must_use]
  pub fn new(vaults: Vec<Vault>) -> Self {
    Self {
      vaults,
      notes: Vec::new(),
      by_fname: HashMap::new(),
    }
  }

  /// Build an index from vaults and notes in one go.
  #[must_use]
  pub fn from_notes<I>(vaults: Vec<Vault>, notes: I) -> Self
  where
    I: IntoIterator<Item = NoteProps>,
  {
    let mut index = Self::new(vaults);
    for note in notes {
      index.insert(note);
    }
    index
  }

  /// Add a note. Its vault is registered if the index does not know it yet.
  pub fn insert(&mut self, note: NoteProps) {
    if !self.vaults.iter().any(|v| v.same_as(&note.vault)) {
      log::debug!(
        "Registering vault {} for note {}",
        note.vault.fs_path,
        note.fname
      );
      self.vaults.push(note.vault.clone());
    }
    let position = self.notes.len();
    self
      .by_fname
      .entry(note.fname.clone())
      .or_default()
      .push(position);
    self.notes.push(note);
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.notes.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.notes.is_empty()
  }

  /// Iterate over all notes in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &NoteProps> {
    self.notes.iter()
  }
}

impl NoteLookup for NoteIndex {
  fn notes_by_fname(
    &self,
    fname: &str,
    vault: Option<&Vault>,
  ) -> Vec<&NoteProps> {
    self
      .by_fname
      .get(fname)
      .into_iter()
      .flatten()
      .map(|&i| &self.notes[i])
      .filter(|note| vault.is_none_or(|v| note.vault.same_as(v)))
      .collect()
  }

  fn notes_by_prefix(
    &self,
    prefix: &str,
    vault: Option<&Vault>,
  ) -> Vec<&NoteProps> {
    let needle = format!("{prefix}.");
    self
      .notes
      .iter()
      .filter(|note| note.fname.starts_with(&needle))
      .filter(|note| vault.is_none_or(|v| note.vault.same_as(v)))
      .collect()
  }

  fn vaults(&self) -> &[Vault] {
    &self.vaults
  }
}
