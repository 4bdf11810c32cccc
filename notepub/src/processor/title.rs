//! Title heading insertion.
use super::types::DocumentContext;
use crate::{
  ast::{Document, NodeKind},
  engine::NoteLookup,
  error::PublishError,
};

/// Insert the note's title as a level-1 heading after any leading
/// front-matter.
///
/// # Errors
///
/// Returns [`PublishError::MissingContext`] when the context lacks the fname
/// or vault, and [`PublishError::NoteNotFoundForTitle`] when no note matches
/// them exactly. Nothing is inserted on error.
pub(crate) fn insert_title(
  document: &mut Document,
  lookup: &dyn NoteLookup,
  ctx: &DocumentContext<'_>,
) -> Result<(), PublishError> {
  let fname = ctx
    .fname
    .as_deref()
    .ok_or(PublishError::MissingContext { field: "fname" })?;
  let vault = ctx
    .vault
    .as_ref()
    .ok_or(PublishError::MissingContext { field: "vault" })?;

  let note = lookup
    .notes_by_fname(fname, Some(vault))
    .into_iter()
    .next()
    .ok_or_else(|| {
      PublishError::NoteNotFoundForTitle {
        fname: fname.to_string(),
        vault: vault.fs_path.clone(),
      }
    })?;

  let root = document.root();
  let position = document
    .children(root)
    .iter()
    .position(|&c| !matches!(document.kind(c), NodeKind::FrontMatter(_)))
    .unwrap_or(document.children(root).len());

  let heading = document.alloc(NodeKind::Heading { depth: 1 });
  document.append(heading, NodeKind::Text(note.title.clone()));
  document.insert_child(root, position, heading);
  log::trace!("Inserted title \"{}\" for {fname}", note.title);
  Ok(())
}
