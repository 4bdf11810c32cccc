//! Error types.
//!
//! Two tiers: per-node problems are [`ErrorRecord`]s collected in an
//! [`ErrorSink`] while the walk carries on, and fatal configuration problems
//! are returned as a [`PublishError`] that aborts the whole document.
use std::fmt;

use thiserror::Error;

use crate::ast::NodeId;

/// Kind of a collected or fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// A reference does not resolve to any note.
  NotFound,
  /// A reference matches several notes and no rule picks one.
  AmbiguousReference,
  /// Title insertion requested without the note's fname or vault.
  MissingContext,
  /// The note to take the title from does not exist.
  NoteNotFoundForTitle,
  /// A note transcludes itself, directly or through other notes.
  CyclicReference,
  /// Publish policy enforcement requested without a site config.
  MissingSiteConfig,
}

impl ErrorKind {
  /// Whether errors of this kind abort the document.
  #[must_use]
  pub const fn is_fatal(self) -> bool {
    matches!(self, Self::MissingContext | Self::NoteNotFoundForTitle)
  }
}

/// Why a reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
  #[error("no note found for `{name}`")]
  NotFound { name: String },

  #[error("no vault named `{vault}` for link to `{name}`")]
  UnknownVault { vault: String, name: String },

  #[error("multiple notes found for `{name}` in vaults: {}", .vaults.join(", "))]
  Ambiguous { name: String, vaults: Vec<String> },
}

impl ResolutionError {
  #[must_use]
  pub const fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound { .. } | Self::UnknownVault { .. } => ErrorKind::NotFound,
      Self::Ambiguous { .. } => ErrorKind::AmbiguousReference,
    }
  }
}

/// Fatal error aborting the processing of a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
  #[error("title insertion requires the note's {field}")]
  MissingContext { field: &'static str },

  #[error("no note found for `{fname}` in vault `{vault}`")]
  NoteNotFoundForTitle { fname: String, vault: String },
}

impl PublishError {
  #[must_use]
  pub const fn kind(&self) -> ErrorKind {
    match self {
      Self::MissingContext { .. } => ErrorKind::MissingContext,
      Self::NoteNotFoundForTitle { .. } => ErrorKind::NoteNotFoundForTitle,
    }
  }
}

/// A per-node error collected during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
  pub kind:    ErrorKind,
  pub message: String,
  /// Node the error originated from, when there is one.
  pub node:    Option<NodeId>,
}

impl ErrorRecord {
  #[must_use]
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
      node: None,
    }
  }

  #[must_use]
  pub const fn at(mut self, node: NodeId) -> Self {
    self.node = Some(node);
    self
  }
}

impl From<&ResolutionError> for ErrorRecord {
  fn from(err: &ResolutionError) -> Self {
    Self::new(err.kind(), err.to_string())
  }
}

impl fmt::Display for ErrorRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}: {}", self.kind, self.message)
  }
}

/// Collects per-node errors for the caller to inspect after the walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSink {
  records: Vec<ErrorRecord>,
}

impl ErrorSink {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, record: ErrorRecord) {
    log::debug!("Recorded {record}");
    self.records.push(record);
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.records.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Number of records of `kind`.
  #[must_use]
  pub fn count(&self, kind: ErrorKind) -> usize {
    self.records.iter().filter(|r| r.kind == kind).count()
  }

  pub fn iter(&self) -> impl Iterator<Item = &ErrorRecord> {
    self.records.iter()
  }

  #[must_use]
  pub fn into_vec(self) -> Vec<ErrorRecord> {
    self.records
  }
}

impl<'a> IntoIterator for &'a ErrorSink {
  type IntoIter = std::slice::Iter<'a, ErrorRecord>;
  type Item = &'a ErrorRecord;

  fn into_iter(self) -> Self::IntoIter {
    self.records.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_resolution_error_kinds() {
    let not_found = ResolutionError::NotFound {
      name: "foo".to_string(),
    };
    let ambiguous = ResolutionError::Ambiguous {
      name:   "foo".to_string(),
      vaults: vec!["v1".to_string(), "v2".to_string()],
    };
    assert_eq!(not_found.kind(), ErrorKind::NotFound);
    assert_eq!(ambiguous.kind(), ErrorKind::AmbiguousReference);
    assert_eq!(
      ambiguous.to_string(),
      "multiple notes found for `foo` in vaults: v1, v2"
    );
  }

  #[test]
  fn test_fatal_kinds() {
    assert!(ErrorKind::MissingContext.is_fatal());
    assert!(ErrorKind::NoteNotFoundForTitle.is_fatal());
    assert!(!ErrorKind::NotFound.is_fatal());
    assert!(!ErrorKind::CyclicReference.is_fatal());
  }

  #[test]
  fn test_sink_counts_by_kind() {
    let mut sink = ErrorSink::new();
    sink.push(ErrorRecord::new(ErrorKind::NotFound, "a"));
    sink.push(ErrorRecord::new(ErrorKind::NotFound, "b"));
    sink.push(ErrorRecord::new(ErrorKind::CyclicReference, "c"));

    assert_eq!(sink.len(), 3);
    assert_eq!(sink.count(ErrorKind::NotFound), 2);
    assert_eq!(sink.count(ErrorKind::AmbiguousReference), 0);
    let messages: Vec<&str> =
      sink.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, vec!["a", "b", "c"]);
  }
}
