//! HTML rendering of processed documents.
//!
//! Rewritten links and unexpanded note references are emitted exclusively
//! from their [`RenderHints`]; the renderer never computes an href itself.
use std::fmt::Write;

use crate::{
  ast::{Document, HintChild, NodeId, NodeKind, RenderHints},
  processor::types::Header,
  utils::slugify,
};

/// Renders a [`Document`] to an HTML fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
  #[must_use]
  pub const fn new() -> Self {
    Self
  }

  /// Render the whole document.
  #[must_use]
  pub fn render(&self, document: &Document) -> String {
    let mut out = String::new();
    self.render_node(document, document.root(), &mut out);
    out
  }

  /// Headings of the document, in order, with the ids the renderer gives
  /// them.
  #[must_use]
  pub fn headers(&self, document: &Document) -> Vec<Header> {
    document
      .descendants(document.root())
      .filter_map(|id| {
        match document.kind(id) {
          NodeKind::Heading { depth } => {
            let text = document.text_content(id);
            Some(Header {
              id: slugify(&text),
              text,
              level: *depth,
            })
          },
          _ => None,
        }
      })
      .collect()
  }

  fn render_children(&self, document: &Document, id: NodeId, out: &mut String) {
    for &child in document.children(id) {
      self.render_node(document, child, out);
    }
  }

  fn render_node(&self, document: &Document, id: NodeId, out: &mut String) {
    if let Some(hints) = document.hints(id) {
      render_hinted(hints, out);
      return;
    }

    match document.kind(id) {
      NodeKind::Root => self.render_children(document, id, out),
      NodeKind::FrontMatter(_) => {},
      NodeKind::Heading { depth } => {
        let slug = slugify(&document.text_content(id));
        let _ = write!(out, "<h{depth} id=\"{}\">", attr(&slug));
        self.render_children(document, id, out);
        let _ = writeln!(out, "</h{depth}>");
      },
      NodeKind::Paragraph if in_tight_list(document, id) => {
        self.render_children(document, id, out);
      },
      NodeKind::Paragraph => {
        out.push_str("<p>");
        self.render_children(document, id, out);
        out.push_str("</p>\n");
      },
      NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
      NodeKind::Emphasis => self.wrap(document, id, "em", out),
      NodeKind::Strong => self.wrap(document, id, "strong", out),
      NodeKind::Strikethrough => self.wrap(document, id, "del", out),
      NodeKind::InlineCode(code) => {
        let _ = write!(out, "<code>{}</code>", html_escape::encode_text(code));
      },
      NodeKind::CodeBlock { info, literal } => {
        let language = info.split_whitespace().next().unwrap_or_default();
        if language.is_empty() {
          out.push_str("<pre><code>");
        } else {
          let _ = write!(out, "<pre><code class=\"language-{}\">", attr(language));
        }
        out.push_str(&html_escape::encode_text(literal));
        out.push_str("</code></pre>\n");
      },
      NodeKind::BlockQuote => {
        out.push_str("<blockquote>\n");
        self.render_children(document, id, out);
        out.push_str("</blockquote>\n");
      },
      NodeKind::List { ordered, start, .. } => {
        line_start(out);
        let tag = if *ordered { "ol" } else { "ul" };
        if *ordered && *start != 1 {
          let _ = writeln!(out, "<ol start=\"{start}\">");
        } else {
          let _ = writeln!(out, "<{tag}>");
        }
        self.render_children(document, id, out);
        let _ = writeln!(out, "</{tag}>");
      },
      NodeKind::ListItem { checked } => {
        out.push_str("<li>");
        if let Some(checked) = checked {
          let state = if *checked { " checked=\"\"" } else { "" };
          let _ = write!(out, "<input type=\"checkbox\"{state} disabled=\"\" /> ");
        }
        self.render_children(document, id, out);
        out.push_str("</li>\n");
      },
      NodeKind::Table { .. } => {
        line_start(out);
        out.push_str("<table>\n");
        let mut in_body = false;
        for &row in document.children(id) {
          if matches!(document.kind(row), NodeKind::TableRow { header: true }) {
            out.push_str("<thead>\n");
            self.render_node(document, row, out);
            out.push_str("</thead>\n");
          } else {
            if !in_body {
              out.push_str("<tbody>\n");
              in_body = true;
            }
            self.render_node(document, row, out);
          }
        }
        if in_body {
          out.push_str("</tbody>\n");
        }
        out.push_str("</table>\n");
      },
      NodeKind::TableRow { .. } => {
        out.push_str("<tr>\n");
        self.render_children(document, id, out);
        out.push_str("</tr>\n");
      },
      NodeKind::TableCell => {
        let (tag, align) = cell_layout(document, id);
        let _ = write!(out, "<{tag}");
        if let Some(align) = align {
          let _ = write!(out, " align=\"{align}\"");
        }
        out.push('>');
        self.render_children(document, id, out);
        let _ = writeln!(out, "</{tag}>");
      },
      NodeKind::ThematicBreak => out.push_str("<hr />\n"),
      NodeKind::SoftBreak => out.push('\n'),
      NodeKind::LineBreak => out.push_str("<br />\n"),
      NodeKind::Link { url, title } => {
        let _ = write!(out, "<a href=\"{}\"", attr(url));
        if !title.is_empty() {
          let _ = write!(out, " title=\"{}\"", attr(title));
        }
        out.push('>');
        self.render_children(document, id, out);
        out.push_str("</a>");
      },
      NodeKind::Image { url, title } => {
        let alt = document.text_content(id);
        let _ = write!(out, "<img src=\"{}\" alt=\"{}\"", attr(url), attr(&alt));
        if !title.is_empty() {
          let _ = write!(out, " title=\"{}\"", attr(title));
        }
        out.push_str(" />");
      },
      NodeKind::Html(html) => out.push_str(html),
      NodeKind::WikiLink(link) => {
        let source = link.reference.to_string();
        let _ = write!(out, "[[{}]]", html_escape::encode_text(&source));
      },
      NodeKind::NoteRef(note_ref) => {
        let source = note_ref.reference.to_string();
        let _ = write!(out, "![[{}]]", html_escape::encode_text(&source));
      },
      NodeKind::Element { tag, attributes } => {
        let _ = write!(out, "<{tag}");
        for (key, value) in attributes {
          let _ = write!(out, " {key}=\"{}\"", attr(value));
        }
        out.push('>');
        self.render_children(document, id, out);
        let _ = write!(out, "</{tag}>");
        if is_block(tag) {
          out.push('\n');
        }
      },
    }
  }

  fn wrap(&self, document: &Document, id: NodeId, tag: &str, out: &mut String) {
    let _ = write!(out, "<{tag}>");
    self.render_children(document, id, out);
    let _ = write!(out, "</{tag}>");
  }
}

/// Emit the element described by `hints` in place of the node.
fn render_hinted(hints: &RenderHints, out: &mut String) {
  let _ = write!(out, "<{}", hints.h_name);
  for (key, value) in &hints.h_properties {
    let _ = write!(out, " {key}=\"{}\"", attr(value));
  }
  out.push('>');
  for child in &hints.h_children {
    match child {
      HintChild::Text(text) => out.push_str(&html_escape::encode_text(text)),
    }
  }
  let _ = write!(out, "</{}>", hints.h_name);
}

/// Start a block on a fresh line, e.g. a nested list inside a tight item.
fn line_start(out: &mut String) {
  if !out.is_empty() && !out.ends_with('\n') {
    out.push('\n');
  }
}

/// Paragraphs in items of a tight list render without `<p>`.
fn in_tight_list(document: &Document, paragraph: NodeId) -> bool {
  document
    .parent(paragraph)
    .filter(|&item| matches!(document.kind(item), NodeKind::ListItem { .. }))
    .and_then(|item| document.parent(item))
    .is_some_and(|list| matches!(document.kind(list), NodeKind::List { tight: true, .. }))
}

/// Tag and alignment of a table cell, from its row and table.
fn cell_layout(document: &Document, cell: NodeId) -> (&'static str, Option<&'static str>) {
  let Some(row) = document.parent(cell) else {
    return ("td", None);
  };
  let tag = match document.kind(row) {
    NodeKind::TableRow { header: true } => "th",
    _ => "td",
  };
  let column = document.children(row).iter().position(|&c| c == cell);
  let align = document
    .parent(row)
    .and_then(|table| {
      match document.kind(table) {
        NodeKind::Table { alignments } => column.and_then(|i| alignments.get(i)),
        _ => None,
      }
    })
    .and_then(|alignment| alignment.attribute());
  (tag, align)
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
  html_escape::encode_double_quoted_attribute(value)
}

fn is_block(tag: &str) -> bool {
  matches!(tag, "div" | "section" | "aside")
}
