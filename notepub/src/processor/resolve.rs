//! Reference resolution against the note lookup.
use notepub_config::TieBreak;

use crate::{
  engine::{NoteLookup, NoteProps, Vault},
  error::ResolutionError,
  reference::NoteReference,
};

/// Maps a [`NoteReference`] to the note(s) it designates.
///
/// Resolution is pure: the same lookup, reference and current vault always
/// produce the same answer.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
  lookup:    &'a dyn NoteLookup,
  tie_break: TieBreak,
}

impl<'a> Resolver<'a> {
  #[must_use]
  pub fn new(lookup: &'a dyn NoteLookup, tie_break: TieBreak) -> Self {
    Self { lookup, tie_break }
  }

  /// Resolve a reference to exactly one note.
  ///
  /// An explicit vault in the reference restricts the candidates to that
  /// vault. When several notes share the name and no vault was given, a note
  /// in `current_vault` is preferred, then the configured [`TieBreak`] rule
  /// applies.
  ///
  /// # Errors
  ///
  /// Returns [`ResolutionError::NotFound`] when nothing matches,
  /// [`ResolutionError::UnknownVault`] when the vault hint names no vault and
  /// [`ResolutionError::Ambiguous`] when the tie-break rule rejects several
  /// candidates.
  pub fn resolve(
    &self,
    reference: &NoteReference,
    current_vault: Option<&Vault>,
  ) -> Result<&'a NoteProps, ResolutionError> {
    let hint = self.vault_hint(reference)?;
    let candidates = self.lookup.notes_by_fname(&reference.name, hint);
    self.pick(&reference.name, candidates, current_vault)
  }

  /// Resolve a reference that may be a `name.*` wildcard.
  ///
  /// Wildcards expand to every note below the hierarchy, ordered by fname
  /// and then by vault order. Plain references resolve to a single note.
  ///
  /// # Errors
  ///
  /// Same as [`Resolver::resolve`]; an empty wildcard is `NotFound`.
  pub fn resolve_all(
    &self,
    reference: &NoteReference,
    current_vault: Option<&Vault>,
  ) -> Result<Vec<&'a NoteProps>, ResolutionError> {
    let Some(prefix) = reference.wildcard_prefix() else {
      return self.resolve(reference, current_vault).map(|note| vec![note]);
    };

    let hint = self.vault_hint(reference)?;
    let mut notes = self.lookup.notes_by_prefix(prefix, hint);
    if notes.is_empty() {
      return Err(ResolutionError::NotFound {
        name: reference.name.clone(),
      });
    }
    notes.sort_by(|a, b| {
      a.fname
        .cmp(&b.fname)
        .then_with(|| self.vault_rank(&a.vault).cmp(&self.vault_rank(&b.vault)))
    });
    Ok(notes)
  }

  /// Map the `dendron://vault/` part of a reference to a known vault.
  fn vault_hint(
    &self,
    reference: &NoteReference,
  ) -> Result<Option<&'a Vault>, ResolutionError> {
    let Some(name) = reference.vault.as_deref() else {
      return Ok(None);
    };
    self
      .lookup
      .vaults()
      .iter()
      .find(|v| v.name() == name || v.fs_path == name)
      .map(Some)
      .ok_or_else(|| {
        ResolutionError::UnknownVault {
          vault: name.to_string(),
          name:  reference.name.clone(),
        }
      })
  }

  fn pick(
    &self,
    name: &str,
    mut candidates: Vec<&'a NoteProps>,
    current_vault: Option<&Vault>,
  ) -> Result<&'a NoteProps, ResolutionError> {
    match candidates.len() {
      0 => {
        return Err(ResolutionError::NotFound {
          name: name.to_string(),
        });
      },
      1 => return Ok(candidates[0]),
      _ => {},
    }

    if let Some(current) = current_vault {
      let local: Vec<&NoteProps> = candidates
        .iter()
        .copied()
        .filter(|note| note.vault.same_as(current))
        .collect();
      if let [only] = local.as_slice() {
        log::trace!("Resolved `{name}` to the current vault {}", current.fs_path);
        return Ok(only);
      }
    }

    match self.tie_break {
      TieBreak::VaultOrder => {
        candidates.sort_by_key(|note| self.vault_rank(&note.vault));
        log::debug!(
          "`{name}` matches {} notes, picking the one in {}",
          candidates.len(),
          candidates[0].vault.fs_path
        );
        Ok(candidates[0])
      },
      TieBreak::Reject => {
        Err(ResolutionError::Ambiguous {
          name:   name.to_string(),
          vaults: candidates
            .iter()
            .map(|note| note.vault.name().to_string())
            .collect(),
        })
      },
    }
  }

  /// Position of `vault` in the engine's vault order; unknown vaults last.
  fn vault_rank(&self, vault: &Vault) -> usize {
    self
      .lookup
      .vaults()
      .iter()
      .position(|v| v.same_as(vault))
      .unwrap_or(usize::MAX)
  }
}
