//! Wiki-link rewriting.
use super::core::Pass;
use crate::{
  ast::{Document, NodeId, NodeKind, RenderHints},
  error::{ErrorKind, ErrorRecord, ErrorSink},
  reference::NoteReference,
};

/// Link target used for notes that must not be exposed.
pub const FORBIDDEN_TARGET: &str = "403";

/// `<prefix><target>.html[#anchor]`. The prefix is used verbatim.
#[must_use]
pub fn note_href(prefix: &str, target: &str, anchor: Option<&str>) -> String {
  match anchor {
    Some(anchor) => format!("{prefix}{target}.html#{anchor}"),
    None => format!("{prefix}{target}.html"),
  }
}

/// Rewrite the wiki-link at `node`: attach render hints and replace its value
/// with the final label.
pub(crate) fn rewrite_wiki_link(
  pass: &Pass<'_>,
  document: &mut Document,
  node: NodeId,
  reference: &NoteReference,
  errors: &mut ErrorSink,
) {
  let hints = link_hints(pass, reference, node, errors);
  if let NodeKind::WikiLink(link) = &mut document.node_mut(node).kind {
    link.value.clone_from(&hints.alias);
  }
  document.set_hints(node, hints);
}

/// Compute the final shape of a link to `reference`.
///
/// With publish policy enforcement, links that do not resolve, that cannot
/// be checked for lack of a site config, or whose note the policy denies
/// point at [`FORBIDDEN_TARGET`]. Only the first two are recorded as errors.
/// With stable ids, links to publishable notes point at the note id.
pub(crate) fn link_hints(
  pass: &Pass<'_>,
  reference: &NoteReference,
  node: NodeId,
  errors: &mut ErrorSink,
) -> RenderHints {
  let options = &pass.options;
  let current_vault = pass.ctx.vault.as_ref();
  let mut target = reference.name.clone();
  let mut publishable = true;

  if options.enforce_publish_policy {
    match pass.resolver.resolve(reference, current_vault) {
      Err(err) => {
        errors.push(ErrorRecord::from(&err).at(node));
        publishable = false;
      },
      Ok(note) => {
        match pass.ctx.config {
          None => {
            errors.push(
              ErrorRecord::new(
                ErrorKind::MissingSiteConfig,
                format!("cannot check whether `{}` may be published", note.fname),
              )
              .at(node),
            );
            publishable = false;
          },
          Some(config) => {
            if !pass.policy.can_publish(note, config, pass.lookup.vaults()) {
              log::debug!("Link to unpublished note {} redirected", note.fname);
              publishable = false;
            }
          },
        }
      },
    }
    if !publishable {
      target = FORBIDDEN_TARGET.to_string();
    }
  }

  if options.use_id && publishable {
    match pass.resolver.resolve(reference, current_vault) {
      Ok(note) => target.clone_from(&note.id),
      Err(err) => errors.push(ErrorRecord::from(&err).at(node)),
    }
  }

  let label = reference.alias.as_deref().unwrap_or(&target);
  let href = note_href(&options.link_prefix, &target, reference.anchor());
  RenderHints::anchor(label, &href, true)
}
