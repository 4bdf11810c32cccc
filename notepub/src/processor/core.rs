//! Publish processor and tree walker.
use notepub_config::{EffectiveOptions, PublishOptions};

use super::{
  assets,
  links,
  refs,
  resolve::Resolver,
  title,
  types::{DocumentContext, Published, RenderedNote},
};
use crate::{
  ast::{Document, NodeId, NodeKind},
  engine::{NoteLookup, NoteProps},
  error::{ErrorSink, PublishError},
  parser::MarkdownParser,
  policy::PublishPolicy,
  reference::NoteReference,
  render::HtmlRenderer,
};

/// Rewrites parsed note documents for publishing.
///
/// The processor holds read-only handles to the note lookup and the publish
/// policy plus processor-wide options. It keeps no per-document state, so one
/// processor can serve many documents, also from several threads.
pub struct PublishProcessor<'a> {
  lookup:  &'a dyn NoteLookup,
  policy:  &'a dyn PublishPolicy,
  options: PublishOptions,
  parser:  MarkdownParser,
}

/// A note on the current transclusion path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathEntry {
  pub(crate) id:    String,
  pub(crate) fname: String,
}

/// State of one walk over one document or transcluded fragment.
pub(crate) struct Pass<'p> {
  pub(crate) lookup:   &'p dyn NoteLookup,
  pub(crate) policy:   &'p dyn PublishPolicy,
  pub(crate) resolver: Resolver<'p>,
  pub(crate) options:  EffectiveOptions,
  pub(crate) ctx:      DocumentContext<'p>,
  /// Notes being expanded, outermost first.
  pub(crate) path:     Vec<PathEntry>,
}

impl Pass<'_> {
  /// Whether `note` is already being expanded further up.
  pub(crate) fn on_path(&self, note: &NoteProps) -> bool {
    self.path.iter().any(|entry| entry.id == note.id)
  }
}

/// What the walker does with a node.
enum Visit {
  Descend,
  Link(NoteReference),
  Reference,
  Image,
  Leaf,
}

impl<'a> PublishProcessor<'a> {
  #[must_use]
  pub fn new(
    lookup: &'a dyn NoteLookup,
    policy: &'a dyn PublishPolicy,
    options: PublishOptions,
  ) -> Self {
    Self {
      lookup,
      policy,
      options,
      parser: MarkdownParser::default(),
    }
  }

  /// Use `parser` for document bodies pulled in by note references.
  #[must_use]
  pub const fn with_parser(mut self, parser: MarkdownParser) -> Self {
    self.parser = parser;
    self
  }

  #[must_use]
  pub const fn options(&self) -> &PublishOptions {
    &self.options
  }

  #[must_use]
  pub const fn parser(&self) -> &MarkdownParser {
    &self.parser
  }

  /// Rewrite `document` in place for publishing.
  ///
  /// Per-node problems (unresolvable links, cyclic references, ...) are
  /// collected in the returned sink and do not stop the walk.
  ///
  /// # Errors
  ///
  /// Returns [`PublishError`] when title insertion is enabled but the
  /// document's fname or vault is missing, or its note cannot be found. The
  /// document is left untouched in that case.
  pub fn process(
    &self,
    document: &mut Document,
    ctx: &DocumentContext<'_>,
  ) -> Result<ErrorSink, PublishError> {
    let options = self.options.resolve(ctx.overrides.as_ref(), ctx.config);

    if options.insert_title {
      title::insert_title(document, self.lookup, ctx)?;
    }

    let mut pass = Pass {
      lookup: self.lookup,
      policy: self.policy,
      resolver: Resolver::new(self.lookup, options.tie_break),
      options,
      ctx: ctx.clone(),
      path: Vec::new(),
    };
    if let (Some(fname), Some(vault)) = (&ctx.fname, &ctx.vault)
      && let Some(note) = self.lookup.notes_by_fname(fname, Some(vault)).first()
    {
      pass.path.push(PathEntry {
        id:    note.id.clone(),
        fname: note.fname.clone(),
      });
    }

    let mut errors = ErrorSink::new();
    let root = document.root();
    self.walk(&pass, document, root, &mut errors);
    log::debug!(
      "Processed {} with {} error(s)",
      ctx.fname.as_deref().unwrap_or("<anonymous document>"),
      errors.len()
    );
    Ok(errors)
  }

  /// Parse `markdown` and process the resulting document.
  ///
  /// # Errors
  ///
  /// See [`PublishProcessor::process`].
  pub fn process_markdown(
    &self,
    markdown: &str,
    ctx: &DocumentContext<'_>,
  ) -> Result<Published, PublishError> {
    let mut document = self.parser.parse(markdown);
    let errors = self.process(&mut document, ctx)?;
    Ok(Published { document, errors })
  }

  /// Parse, process and render `markdown` to HTML.
  ///
  /// # Errors
  ///
  /// See [`PublishProcessor::process`].
  pub fn render(
    &self,
    markdown: &str,
    ctx: &DocumentContext<'_>,
  ) -> Result<RenderedNote, PublishError> {
    let Published { document, errors } = self.process_markdown(markdown, ctx)?;
    let renderer = HtmlRenderer::new();
    let headers = renderer.headers(&document);
    let title = headers
      .iter()
      .find(|header| header.level == 1)
      .map(|header| header.text.clone());
    Ok(RenderedNote {
      html: renderer.render(&document),
      headers,
      title,
      errors,
    })
  }

  /// Depth-first, parent-before-children walk from `start`.
  ///
  /// Children are pushed when their parent is visited, so replacing a node in
  /// its parent neither skips its siblings nor visits the inserted nodes,
  /// which arrive fully processed.
  pub(crate) fn walk(
    &self,
    pass: &Pass<'_>,
    document: &mut Document,
    start: NodeId,
    errors: &mut ErrorSink,
  ) {
    let dest = pass.ctx.dest;
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
      let visit = match document.kind(id) {
        NodeKind::WikiLink(link) => Visit::Link(link.reference.clone()),
        NodeKind::NoteRef(_) => Visit::Reference,
        NodeKind::Image { .. } => Visit::Image,
        NodeKind::Root
        | NodeKind::Heading { .. }
        | NodeKind::Paragraph
        | NodeKind::Emphasis
        | NodeKind::Strong
        | NodeKind::Strikethrough
        | NodeKind::BlockQuote
        | NodeKind::List { .. }
        | NodeKind::ListItem { .. }
        | NodeKind::Table { .. }
        | NodeKind::TableRow { .. }
        | NodeKind::TableCell
        | NodeKind::Link { .. }
        | NodeKind::Element { .. } => Visit::Descend,
        NodeKind::FrontMatter(_)
        | NodeKind::Text(_)
        | NodeKind::InlineCode(_)
        | NodeKind::CodeBlock { .. }
        | NodeKind::ThematicBreak
        | NodeKind::SoftBreak
        | NodeKind::LineBreak
        | NodeKind::Html(_) => Visit::Leaf,
      };

      match visit {
        Visit::Descend => {
          stack.extend(document.children(id).iter().rev().copied());
        },
        Visit::Link(reference) => {
          if dest.rewrites_links() {
            links::rewrite_wiki_link(pass, document, id, &reference, errors);
          }
        },
        Visit::Reference => {
          if dest.rewrites_links() {
            refs::expand_reference(self, pass, document, id, errors);
          }
        },
        Visit::Image => {
          if dest.rewrites_assets()
            && let Some(prefix) = pass.options.assets_prefix.as_deref()
          {
            assets::rewrite_image(document, id, prefix);
          }
          stack.extend(document.children(id).iter().rev().copied());
        },
        Visit::Leaf => {},
      }
    }
  }
}
