//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` owned by [`Document`] and refer to each other
//! through [`NodeId`] indices. Every node stores its parent explicitly, so
//! replacing a node in its parent is a splice of an index list rather than a
//! pointer rewrite. Detached nodes stay in the arena; they are simply no
//! longer reachable from the root.
use std::collections::BTreeMap;

use crate::reference::NoteReference;

/// Index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  /// Position of the node in the arena.
  #[must_use]
  pub const fn index(self) -> usize {
    self.0
  }
}

/// Which syntax a note reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefVariant {
  /// `((ref: [[name]]#start,1:#end))`
  Legacy,
  /// `![[name#start:#end]]`
  Current,
}

/// Internal link to another note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
  /// Text shown for the link. Starts out as the raw target and becomes the
  /// final label once the link is rewritten.
  pub value:     String,
  pub reference: NoteReference,
}

/// Directive to inline (part of) another note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRef {
  pub variant:   RefVariant,
  pub reference: NoteReference,
}

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
  #[default]
  None,
  Left,
  Center,
  Right,
}

impl Alignment {
  /// Value of the `align` attribute, if any.
  #[must_use]
  pub const fn attribute(self) -> Option<&'static str> {
    match self {
      Self::None => None,
      Self::Left => Some("left"),
      Self::Center => Some("center"),
      Self::Right => Some("right"),
    }
  }
}

/// Node types of the document tree.
///
/// The set is closed on purpose: the walker matches it exhaustively, so a new
/// variant has to be handled everywhere before the crate compiles again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
  Root,
  /// Raw front-matter block, delimiters included.
  FrontMatter(String),
  Heading {
    depth: u8,
  },
  Paragraph,
  Text(String),
  Emphasis,
  Strong,
  Strikethrough,
  InlineCode(String),
  CodeBlock {
    info:    String,
    literal: String,
  },
  BlockQuote,
  List {
    ordered: bool,
    start:   usize,
    /// Items of a tight list render without paragraph wrappers.
    tight:   bool,
  },
  /// `checked` is set for task list items.
  ListItem {
    checked: Option<bool>,
  },
  Table {
    alignments: Vec<Alignment>,
  },
  TableRow {
    header: bool,
  },
  TableCell,
  ThematicBreak,
  SoftBreak,
  LineBreak,
  Link {
    url:   String,
    title: String,
  },
  /// Alt text is carried by the children.
  Image {
    url:   String,
    title: String,
  },
  /// Raw HTML, also used for markdown constructs the tree does not model.
  Html(String),
  WikiLink(WikiLink),
  NoteRef(NoteRef),
  /// Container synthesised by the pipeline (e.g. reference portals).
  Element {
    tag:        String,
    attributes: Vec<(String, String)>,
  },
}

impl NodeKind {
  /// Short name of the variant, for logs and error messages.
  #[must_use]
  pub const fn name(&self) -> &'static str {
    match self {
      Self::Root => "root",
      Self::FrontMatter(_) => "frontmatter",
      Self::Heading { .. } => "heading",
      Self::Paragraph => "paragraph",
      Self::Text(_) => "text",
      Self::Emphasis => "emphasis",
      Self::Strong => "strong",
      Self::Strikethrough => "strikethrough",
      Self::InlineCode(_) => "inlineCode",
      Self::CodeBlock { .. } => "code",
      Self::BlockQuote => "blockquote",
      Self::List { .. } => "list",
      Self::ListItem { .. } => "listItem",
      Self::Table { .. } => "table",
      Self::TableRow { .. } => "tableRow",
      Self::TableCell => "tableCell",
      Self::ThematicBreak => "thematicBreak",
      Self::SoftBreak => "softBreak",
      Self::LineBreak => "break",
      Self::Link { .. } => "link",
      Self::Image { .. } => "image",
      Self::Html(_) => "html",
      Self::WikiLink(_) => "wikiLink",
      Self::NoteRef(NoteRef {
        variant: RefVariant::Legacy,
        ..
      }) => "refLink",
      Self::NoteRef(NoteRef {
        variant: RefVariant::Current,
        ..
      }) => "refLinkV2",
      Self::Element { .. } => "element",
    }
  }
}

/// Substitute child emitted by the renderer in place of a node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintChild {
  Text(String),
}

/// Final shape of a rewritten link, as consumed by the renderer.
///
/// Once attached, the renderer reads links exclusively through these fields
/// and never derives an href on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderHints {
  /// Visible label.
  pub alias:        String,
  /// Destination href.
  pub permalink:    String,
  pub exists:       bool,
  /// Element the renderer emits for the node.
  pub h_name:       String,
  pub h_properties: BTreeMap<String, String>,
  pub h_children:   Vec<HintChild>,
}

impl RenderHints {
  /// Hints for an `<a href=..>label</a>` element.
  #[must_use]
  pub fn anchor(label: &str, href: &str, exists: bool) -> Self {
    let mut h_properties = BTreeMap::new();
    h_properties.insert("href".to_string(), href.to_string());
    Self {
      alias: label.to_string(),
      permalink: href.to_string(),
      exists,
      h_name: "a".to_string(),
      h_properties,
      h_children: vec![HintChild::Text(label.to_string())],
    }
  }
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  pub kind:     NodeKind,
  pub parent:   Option<NodeId>,
  pub children: Vec<NodeId>,
  pub hints:    Option<RenderHints>,
}

impl Node {
  const fn new(kind: NodeKind) -> Self {
    Self {
      kind,
      parent: None,
      children: Vec::new(),
      hints: None,
    }
  }
}

/// Ordered, mutable document tree stored in an arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  nodes: Vec<Node>,
  root:  NodeId,
}

impl Default for Document {
  fn default() -> Self {
    Self::new()
  }
}

impl Document {
  /// Create a document containing only a root node.
  #[must_use]
  pub fn new() -> Self {
    Self {
      nodes: vec![Node::new(NodeKind::Root)],
      root:  NodeId(0),
    }
  }

  #[must_use]
  pub const fn root(&self) -> NodeId {
    self.root
  }

  /// Number of nodes in the arena, detached ones included.
  #[must_use]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  #[must_use]
  pub fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.0]
  }

  pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
    &mut self.nodes[id.0]
  }

  #[must_use]
  pub fn kind(&self, id: NodeId) -> &NodeKind {
    &self.nodes[id.0].kind
  }

  #[must_use]
  pub fn children(&self, id: NodeId) -> &[NodeId] {
    &self.nodes[id.0].children
  }

  #[must_use]
  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.nodes[id.0].parent
  }

  #[must_use]
  pub fn hints(&self, id: NodeId) -> Option<&RenderHints> {
    self.nodes[id.0].hints.as_ref()
  }

  pub fn set_hints(&mut self, id: NodeId, hints: RenderHints) {
    self.nodes[id.0].hints = Some(hints);
  }

  /// Allocate a detached node.
  pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(Node::new(kind));
    id
  }

  /// Allocate a node and append it to `parent`.
  pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
    let id = self.alloc(kind);
    self.append_child(parent, id);
    id
  }

  /// Append an existing node to `parent`, detaching it from its old parent
  /// first.
  pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
    self.detach(child);
    self.nodes[child.0].parent = Some(parent);
    self.nodes[parent.0].children.push(child);
  }

  /// Insert an existing node among `parent`'s children at `index` (clamped
  /// to the number of children).
  pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
    self.detach(child);
    let children = &mut self.nodes[parent.0].children;
    let index = index.min(children.len());
    children.insert(index, child);
    self.nodes[child.0].parent = Some(parent);
  }

  /// Remove a node from its parent. The node keeps its own subtree.
  pub fn detach(&mut self, id: NodeId) {
    if let Some(parent) = self.nodes[id.0].parent.take() {
      self.nodes[parent.0].children.retain(|&c| c != id);
    }
  }

  /// Detach and return all children of `id`, in order.
  pub fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
    let children = std::mem::take(&mut self.nodes[id.0].children);
    for &child in &children {
      self.nodes[child.0].parent = None;
    }
    children
  }

  /// Replace `id` in its parent by `replacements`, keeping sibling order.
  ///
  /// Returns `false` (and changes nothing) when `id` has no parent.
  pub fn replace_with(&mut self, id: NodeId, replacements: &[NodeId]) -> bool {
    let Some(parent) = self.nodes[id.0].parent else {
      return false;
    };
    for &replacement in replacements {
      self.detach(replacement);
    }
    let Some(position) =
      self.nodes[parent.0].children.iter().position(|&c| c == id)
    else {
      return false;
    };

    for &replacement in replacements {
      self.nodes[replacement.0].parent = Some(parent);
    }
    self.nodes[parent.0]
      .children
      .splice(position..=position, replacements.iter().copied());
    self.nodes[id.0].parent = None;
    true
  }

  /// Pre-order traversal of `id` and everything below it.
  #[must_use]
  pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
    Descendants {
      document: self,
      stack:    vec![id],
    }
  }

  /// Whether `id` is reachable from the root.
  #[must_use]
  pub fn is_attached(&self, id: NodeId) -> bool {
    let mut current = id;
    while let Some(parent) = self.nodes[current.0].parent {
      current = parent;
    }
    current == self.root
  }

  /// Concatenated plain text below `id`.
  #[must_use]
  pub fn text_content(&self, id: NodeId) -> String {
    let mut text = String::new();
    for node in self.descendants(id) {
      match self.kind(node) {
        NodeKind::Text(t) | NodeKind::InlineCode(t) => text.push_str(t),
        NodeKind::WikiLink(link) => text.push_str(&link.value),
        NodeKind::SoftBreak | NodeKind::LineBreak => text.push(' '),
        _ => {},
      }
    }
    text
  }
}

/// Iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
  document: &'a Document,
  stack:    Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
  type Item = NodeId;

  fn next(&mut self) -> Option<Self::Item> {
    let id = self.stack.pop()?;
    self
      .stack
      .extend(self.document.children(id).iter().rev().copied());
    Some(id)
  }
}
