//! Markdown to [`Document`] conversion.
//!
//! Parsing is delegated to comrak; this module converts comrak's AST into the
//! arena tree and recognises the note syntax comrak knows nothing about:
//!
//! - `[[alias|name#anchor]]` wiki-links,
//! - `![[name#start:#end]]` note references,
//! - `((ref: [[name]]#start:#end))` legacy note references.
//!
//! Comrak may split a run of text at bracket characters, so adjacent text
//! nodes are merged before scanning for the note syntax. Markdown constructs
//! the tree does not model (footnotes, alerts, description lists, ...) are
//! kept as pre-rendered HTML.
use std::sync::LazyLock;

use comrak::{
  Arena,
  nodes::{AstNode, ListType, NodeHeading, NodeValue, TableAlignment},
  options::Options,
  parse_document,
};
use regex::{Captures, Regex};

use crate::{
  ast::{Alignment, Document, NodeId, NodeKind, NoteRef, RefVariant, WikiLink},
  reference::NoteReference,
  utils,
};

static NOTE_SYNTAX_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?x)
      \(\(ref:\s*\[\[(?P<legacy>[^\]]+)\]\](?P<legacy_range>[^)]*)\)\)
    | !\[\[(?P<embed>[^\]]+)\]\]
    | \[\[(?P<link>[^\]]+)\]\]
    ",
  )
  .unwrap_or_else(|e| {
    log::error!(
      "Failed to compile NOTE_SYNTAX_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    utils::never_matching_regex()
  })
});

/// Converts markdown into the arena tree.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownParser {
  /// Enable GitHub Flavored Markdown extensions.
  pub gfm: bool,
}

impl Default for MarkdownParser {
  fn default() -> Self {
    Self { gfm: true }
  }
}

/// Intermediate classification of a comrak node.
enum Converted {
  Root,
  Text(String),
  Node(NodeKind),
  Raw,
}

impl MarkdownParser {
  #[must_use]
  pub const fn new(gfm: bool) -> Self {
    Self { gfm }
  }

  /// Parse `markdown` into a fresh document.
  #[must_use]
  pub fn parse(&self, markdown: &str) -> Document {
    let mut document = Document::new();
    let root = document.root();
    self.parse_under(&mut document, root, markdown);
    document
  }

  /// Parse `markdown` into an existing document.
  ///
  /// The content is placed under a new, detached root node whose id is
  /// returned; the caller decides where its children end up.
  pub fn parse_into(&self, document: &mut Document, markdown: &str) -> NodeId {
    let fragment = document.alloc(NodeKind::Root);
    self.parse_under(document, fragment, markdown);
    fragment
  }

  fn parse_under(&self, document: &mut Document, target: NodeId, markdown: &str) {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);
    self.convert(document, target, root, &options);
  }

  /// Build comrak options.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
    }
    options.extension.front_matter_delimiter = Some("---".to_string());
    options.render.r#unsafe = true;
    options
  }

  fn convert<'a>(
    &self,
    document: &mut Document,
    parent: NodeId,
    node: &'a AstNode<'a>,
    options: &Options,
  ) {
    match classify(node) {
      Converted::Root => self.convert_children(document, parent, node, options),
      Converted::Text(text) => push_inline_text(document, parent, &text),
      Converted::Node(kind) => {
        let is_paragraph = kind == NodeKind::Paragraph;
        let id = document.append(parent, kind);
        self.convert_children(document, id, node, options);
        if is_paragraph {
          hoist_lone_reference(document, id);
        }
      },
      Converted::Raw => {
        let mut html = String::new();
        comrak::format_html(node, options, &mut html).unwrap_or_default();
        log::trace!("Keeping unmodelled markdown node as raw HTML");
        document.append(parent, NodeKind::Html(html));
      },
    }
  }

  /// Convert children, merging runs of text nodes first.
  fn convert_children<'a>(
    &self,
    document: &mut Document,
    parent: NodeId,
    node: &'a AstNode<'a>,
    options: &Options,
  ) {
    let mut pending = String::new();
    for child in node.children() {
      if let NodeValue::Text(t) = &child.data.borrow().value {
        pending.push_str(t);
        continue;
      }
      if !pending.is_empty() {
        push_inline_text(document, parent, &std::mem::take(&mut pending));
      }
      self.convert(document, parent, child, options);
    }
    if !pending.is_empty() {
      push_inline_text(document, parent, &pending);
    }
  }
}

fn classify<'a>(node: &'a AstNode<'a>) -> Converted {
  let data = node.data.borrow();
  let kind = match &data.value {
    NodeValue::Document => return Converted::Root,
    NodeValue::Text(t) => return Converted::Text(t.to_string()),
    NodeValue::FrontMatter(raw) => NodeKind::FrontMatter(raw.clone()),
    NodeValue::BlockQuote => NodeKind::BlockQuote,
    NodeValue::List(list) => {
      NodeKind::List {
        ordered: list.list_type == ListType::Ordered,
        start:   list.start,
        tight:   list.tight,
      }
    },
    NodeValue::Item(_) => NodeKind::ListItem { checked: None },
    NodeValue::TaskItem(task) => {
      NodeKind::ListItem {
        checked: Some(task.symbol.is_some()),
      }
    },
    NodeValue::Table(table) => {
      NodeKind::Table {
        alignments: table.alignments.iter().map(|&a| alignment(a)).collect(),
      }
    },
    NodeValue::TableRow(header) => NodeKind::TableRow { header: *header },
    NodeValue::TableCell => NodeKind::TableCell,
    NodeValue::CodeBlock(block) => {
      NodeKind::CodeBlock {
        info:    block.info.clone(),
        literal: block.literal.clone(),
      }
    },
    NodeValue::HtmlBlock(block) => NodeKind::Html(block.literal.clone()),
    NodeValue::Paragraph => NodeKind::Paragraph,
    NodeValue::Heading(NodeHeading { level, .. }) => {
      NodeKind::Heading { depth: *level }
    },
    NodeValue::ThematicBreak => NodeKind::ThematicBreak,
    NodeValue::SoftBreak => NodeKind::SoftBreak,
    NodeValue::LineBreak => NodeKind::LineBreak,
    NodeValue::Code(code) => NodeKind::InlineCode(code.literal.clone()),
    NodeValue::HtmlInline(html) => NodeKind::Html(html.clone()),
    NodeValue::Emph => NodeKind::Emphasis,
    NodeValue::Strong => NodeKind::Strong,
    NodeValue::Strikethrough => NodeKind::Strikethrough,
    NodeValue::Link(link) => {
      NodeKind::Link {
        url:   link.url.clone(),
        title: link.title.clone(),
      }
    },
    NodeValue::Image(link) => {
      NodeKind::Image {
        url:   link.url.clone(),
        title: link.title.clone(),
      }
    },
    _ => return Converted::Raw,
  };
  Converted::Node(kind)
}

const fn alignment(alignment: TableAlignment) -> Alignment {
  match alignment {
    TableAlignment::None => Alignment::None,
    TableAlignment::Left => Alignment::Left,
    TableAlignment::Center => Alignment::Center,
    TableAlignment::Right => Alignment::Right,
  }
}

/// Append `text` to `parent`, turning note syntax into note nodes.
fn push_inline_text(document: &mut Document, parent: NodeId, text: &str) {
  let mut last = 0;
  for caps in NOTE_SYNTAX_RE.captures_iter(text) {
    let Some(whole) = caps.get(0) else {
      continue;
    };
    let Some(kind) = note_node(&caps) else {
      continue;
    };
    if whole.start() > last {
      document.append(parent, NodeKind::Text(text[last..whole.start()].to_string()));
    }
    document.append(parent, kind);
    last = whole.end();
  }
  if last < text.len() {
    document.append(parent, NodeKind::Text(text[last..].to_string()));
  }
}

/// Build the node for one match of [`NOTE_SYNTAX_RE`]. Malformed targets
/// yield `None` and stay plain text.
fn note_node(caps: &Captures<'_>) -> Option<NodeKind> {
  let parsed = if let Some(legacy) = caps.name("legacy") {
    let range = caps.name("legacy_range").map_or("", |m| m.as_str());
    NoteReference::parse_ref(&format!("{}{}", legacy.as_str(), range.trim()))
      .map(|reference| {
        NodeKind::NoteRef(NoteRef {
          variant: RefVariant::Legacy,
          reference,
        })
      })
  } else if let Some(embed) = caps.name("embed") {
    NoteReference::parse_ref(embed.as_str()).map(|reference| {
      NodeKind::NoteRef(NoteRef {
        variant: RefVariant::Current,
        reference,
      })
    })
  } else {
    let link = caps.name("link")?;
    NoteReference::parse_link(link.as_str()).map(|reference| {
      NodeKind::WikiLink(WikiLink {
        value: reference.name.clone(),
        reference,
      })
    })
  };

  parsed
    .inspect_err(|e| log::trace!("Leaving note syntax as text: {e}"))
    .ok()
}

/// A paragraph holding nothing but a note reference becomes the reference,
/// so the expansion lands at block level.
fn hoist_lone_reference(document: &mut Document, paragraph: NodeId) {
  let meaningful: Vec<NodeId> = document
    .children(paragraph)
    .iter()
    .copied()
    .filter(|&c| {
      !matches!(document.kind(c), NodeKind::Text(t) if t.trim().is_empty())
        && !matches!(document.kind(c), NodeKind::SoftBreak)
    })
    .collect();

  if let [only] = meaningful.as_slice()
    && matches!(document.kind(*only), NodeKind::NoteRef(_))
  {
    document.replace_with(paragraph, &[*only]);
  }
}
