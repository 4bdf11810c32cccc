//! Note reference expansion.
//!
//! A note reference is replaced by (a slice of) the referenced note's body.
//! The body is parsed into the same arena and run through the whole pipeline
//! with the referenced note as the current document, so links inside it are
//! rewritten relative to that note and nested references expand in turn.
//!
//! Notes already being expanded further up are tracked on the pass; meeting
//! one again is reported as a cycle instead of recursing. A reference that
//! cannot be expanded for any reason stays in place and renders as a plain
//! link to its target.
use super::{
  core::{Pass, PathEntry, PublishProcessor},
  links::{link_hints, note_href},
};
use crate::{
  ast::{Document, NodeId, NodeKind},
  engine::NoteProps,
  error::{ErrorKind, ErrorRecord, ErrorSink},
  reference::NoteReference,
  utils::anchor_matches,
};

/// Range end meaning "until the end of the note".
const END_OF_NOTE: &str = "*";

/// Expand the note reference at `node` in place.
pub(crate) fn expand_reference(
  processor: &PublishProcessor<'_>,
  pass: &Pass<'_>,
  document: &mut Document,
  node: NodeId,
  errors: &mut ErrorSink,
) {
  let NodeKind::NoteRef(note_ref) = document.kind(node) else {
    return;
  };
  let reference = note_ref.reference.clone();

  match expansion(processor, pass, document, node, &reference, errors) {
    Some(content) => splice(document, node, &content),
    None => degrade(pass, document, node, &reference),
  }
}

/// Build the nodes replacing the reference, or `None` if it stays.
fn expansion(
  processor: &PublishProcessor<'_>,
  pass: &Pass<'_>,
  document: &mut Document,
  node: NodeId,
  reference: &NoteReference,
  errors: &mut ErrorSink,
) -> Option<Vec<NodeId>> {
  let mut notes = match pass.resolver.resolve_all(reference, pass.ctx.vault.as_ref()) {
    Ok(notes) => notes,
    Err(err) => {
      errors.push(ErrorRecord::from(&err).at(node));
      return None;
    },
  };

  if pass.options.enforce_publish_policy {
    let Some(config) = pass.ctx.config else {
      errors.push(
        ErrorRecord::new(
          ErrorKind::MissingSiteConfig,
          format!("cannot check whether `{reference}` may be published"),
        )
        .at(node),
      );
      return None;
    };
    notes.retain(|note| pass.policy.can_publish(note, config, pass.lookup.vaults()));
    if notes.is_empty() {
      log::debug!("Reference to unpublished note {reference} left unexpanded");
      return None;
    }
  }

  if let Some(note) = notes.iter().find(|note| pass.on_path(note)) {
    let chain: Vec<&str> = pass
      .path
      .iter()
      .map(|entry| entry.fname.as_str())
      .chain([note.fname.as_str()])
      .collect();
    errors.push(
      ErrorRecord::new(
        ErrorKind::CyclicReference,
        format!("cyclic note reference: {}", chain.join(" -> ")),
      )
      .at(node),
    );
    return None;
  }

  let mut content = Vec::new();
  for note in notes {
    match include_note(processor, pass, document, note, reference, errors) {
      Ok(nodes) => content.extend(nodes),
      Err(record) => {
        errors.push(record.at(node));
        return None;
      },
    }
  }
  Some(content)
}

/// Parse, slice and process the body of `note`.
fn include_note(
  processor: &PublishProcessor<'_>,
  pass: &Pass<'_>,
  document: &mut Document,
  note: &NoteProps,
  reference: &NoteReference,
  errors: &mut ErrorSink,
) -> Result<Vec<NodeId>, ErrorRecord> {
  let fragment = processor.parser().parse_into(document, &note.body);
  let blocks = document.take_children(fragment);
  let selected = select_range(
    document,
    &blocks,
    reference.anchor_start.as_deref(),
    reference.anchor_end.as_deref(),
  )
  .map_err(|anchor| {
    ErrorRecord::new(
      ErrorKind::NotFound,
      format!("no heading `{anchor}` in note `{}`", note.fname),
    )
  })?;
  for id in selected {
    document.append_child(fragment, id);
  }

  let mut path = pass.path.clone();
  path.push(PathEntry {
    id:    note.id.clone(),
    fname: note.fname.clone(),
  });
  let nested = Pass {
    lookup: pass.lookup,
    policy: pass.policy,
    resolver: pass.resolver,
    options: pass.options.clone(),
    ctx: pass.ctx.for_transclusion(&note.fname, &note.vault),
    path,
  };
  processor.walk(&nested, document, fragment, errors);

  let content = document.take_children(fragment);
  if pass.options.pretty_refs {
    Ok(vec![portal(pass, document, note, content)])
  } else {
    Ok(content)
  }
}

/// Pick the blocks between the `start` and `end` headings.
///
/// The start heading is included, the end heading is not. Without an end the
/// range stops at the next heading at the same or a shallower level; `*`
/// runs to the end of the note. Returns the anchor that matched no heading on
/// failure.
fn select_range(
  document: &Document,
  blocks: &[NodeId],
  start: Option<&str>,
  end: Option<&str>,
) -> Result<Vec<NodeId>, String> {
  let blocks: Vec<NodeId> = blocks
    .iter()
    .copied()
    .filter(|&b| !matches!(document.kind(b), NodeKind::FrontMatter(_)))
    .collect();

  let depth_of = |id: NodeId| {
    match document.kind(id) {
      NodeKind::Heading { depth } => Some(*depth),
      _ => None,
    }
  };
  let find_heading = |from: usize, anchor: &str| {
    blocks[from..]
      .iter()
      .position(|&b| {
        depth_of(b).is_some() && anchor_matches(&document.text_content(b), anchor)
      })
      .map(|offset| offset + from)
  };

  let (begin, depth) = match start {
    None => (0, None),
    Some(anchor) => {
      let index = find_heading(0, anchor).ok_or_else(|| anchor.to_string())?;
      (index, depth_of(blocks[index]))
    },
  };
  let after = if start.is_some() { begin + 1 } else { begin };

  let finish = match (end, depth) {
    (Some(END_OF_NOTE), _) | (None, None) => blocks.len(),
    (Some(anchor), _) => {
      find_heading(after, anchor).ok_or_else(|| anchor.to_string())?
    },
    (None, Some(depth)) => {
      blocks[after..]
        .iter()
        .position(|&b| depth_of(b).is_some_and(|d| d <= depth))
        .map_or(blocks.len(), |offset| offset + after)
    },
  };

  Ok(blocks[begin..finish].to_vec())
}

/// Wrap expanded content in a portal with a header linking to its note.
fn portal(
  pass: &Pass<'_>,
  document: &mut Document,
  note: &NoteProps,
  content: Vec<NodeId>,
) -> NodeId {
  let target = if pass.options.use_id { &note.id } else { &note.fname };
  let href = note_href(&pass.options.link_prefix, target, None);

  let container = document.alloc(element("div", &[("class", "portal-container")]));
  let head = document.append(container, element("div", &[("class", "portal-head")]));
  let arrow = document.append(
    head,
    element("a", &[("class", "portal-arrow"), ("href", href.as_str())]),
  );
  document.append(arrow, NodeKind::Text(note.title.clone()));

  let body = document.append(container, element("div", &[("class", "portal-parent")]));
  for id in content {
    document.append_child(body, id);
  }
  container
}

fn element(tag: &str, attributes: &[(&str, &str)]) -> NodeKind {
  NodeKind::Element {
    tag:        tag.to_string(),
    attributes: attributes
      .iter()
      .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
      .collect(),
  }
}

/// Put `content` where the reference was.
///
/// Inside a paragraph, an expansion that is a single paragraph contributes
/// its inline content. Any other block content splits the paragraph around
/// the reference; halves left without content are dropped.
fn splice(document: &mut Document, node: NodeId, content: &[NodeId]) {
  let Some(paragraph) = document
    .parent(node)
    .filter(|&p| matches!(document.kind(p), NodeKind::Paragraph))
  else {
    document.replace_with(node, content);
    return;
  };

  if let [only] = content
    && matches!(document.kind(*only), NodeKind::Paragraph)
  {
    let children = document.take_children(*only);
    document.replace_with(node, &children);
    return;
  }
  if content.iter().all(|&id| is_inline(document.kind(id))) {
    document.replace_with(node, content);
    return;
  }

  let siblings = document.take_children(paragraph);
  let at = siblings.iter().position(|&c| c == node).unwrap_or(siblings.len());
  let before = &siblings[..at];
  let after = siblings.get(at + 1..).unwrap_or_default();

  let mut blocks = Vec::with_capacity(content.len() + 2);
  if let Some(head) = inline_paragraph(document, before) {
    blocks.push(head);
  }
  blocks.extend_from_slice(content);
  if let Some(tail) = inline_paragraph(document, after) {
    blocks.push(tail);
  }
  document.replace_with(paragraph, &blocks);
}

/// A new paragraph holding `inlines`, unless they are only whitespace.
fn inline_paragraph(document: &mut Document, inlines: &[NodeId]) -> Option<NodeId> {
  let blank = inlines.iter().all(|&id| {
    match document.kind(id) {
      NodeKind::Text(text) => text.trim().is_empty(),
      NodeKind::SoftBreak | NodeKind::LineBreak => true,
      _ => false,
    }
  });
  if blank {
    return None;
  }
  let paragraph = document.alloc(NodeKind::Paragraph);
  for &id in inlines {
    document.append_child(paragraph, id);
  }
  Some(paragraph)
}

const fn is_inline(kind: &NodeKind) -> bool {
  matches!(
    kind,
    NodeKind::Text(_)
      | NodeKind::Emphasis
      | NodeKind::Strong
      | NodeKind::Strikethrough
      | NodeKind::InlineCode(_)
      | NodeKind::SoftBreak
      | NodeKind::LineBreak
      | NodeKind::Link { .. }
      | NodeKind::Image { .. }
      | NodeKind::Html(_)
      | NodeKind::WikiLink(_)
      | NodeKind::NoteRef(_)
  )
}

/// Leave the reference in place, rendered as a link to its target.
fn degrade(
  pass: &Pass<'_>,
  document: &mut Document,
  node: NodeId,
  reference: &NoteReference,
) {
  // Whatever made the expansion fail has been recorded already.
  let mut scratch = ErrorSink::new();
  let hints = link_hints(pass, reference, node, &mut scratch);
  document.set_hints(node, hints);
}
