//! Batch processing.
use rayon::prelude::*;

use super::{
  core::PublishProcessor,
  types::{DocumentContext, Published},
};
use crate::{
  ast::Document,
  error::PublishError,
  render::HtmlRenderer,
};

/// A document queued for batch processing, with its own context.
#[derive(Debug, Clone)]
pub struct BatchItem<'a> {
  pub document: Document,
  pub context:  DocumentContext<'a>,
}

impl<'a> BatchItem<'a> {
  #[must_use]
  pub const fn new(document: Document, context: DocumentContext<'a>) -> Self {
    Self { document, context }
  }
}

/// Process many documents in parallel.
///
/// Each document is processed independently with its own context and error
/// sink; a fatal error affects only its own document. Results are returned
/// in input order.
pub fn process_batch(
  processor: &PublishProcessor<'_>,
  items: Vec<BatchItem<'_>>,
) -> Vec<Result<Published, PublishError>> {
  log::debug!("Processing batch of {} document(s)", items.len());
  items
    .into_par_iter()
    .map(|item| {
      let BatchItem {
        mut document,
        context,
      } = item;
      let errors = processor.process(&mut document, &context)?;
      Ok(Published { document, errors })
    })
    .collect()
}

/// Parse, process and render many markdown sources in parallel.
///
/// Fatal errors are logged with the index of the failing source and do not
/// affect the other sources.
pub fn render_batch(
  processor: &PublishProcessor<'_>,
  sources: &[(&str, DocumentContext<'_>)],
) -> Vec<Result<String, PublishError>> {
  sources
    .par_iter()
    .enumerate()
    .map(|(index, (markdown, context))| {
      processor
        .process_markdown(markdown, context)
        .map(|published| HtmlRenderer::new().render(&published.document))
        .inspect_err(|e| log::warn!("Document #{index} failed: {e}"))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use notepub_config::{PublishOptions, PublishOptionsBuilder};

  use super::*;
  use crate::{
    engine::{NoteIndex, NoteProps, Vault},
    parser::MarkdownParser,
    policy::SitePolicy,
    processor::Destination,
  };

  fn index() -> NoteIndex {
    let vault = Vault::new("v1");
    NoteIndex::from_notes(
      vec![vault.clone()],
      (0..20).map(|i| NoteProps::new(format!("id-{i}"), format!("n{i}"), vault.clone())),
    )
  }

  #[test]
  fn test_batch_keeps_order_and_isolates_errors() {
    let index = index();
    let options = PublishOptionsBuilder::new().insert_title(true).build();
    let processor = PublishProcessor::new(&index, &SitePolicy, options);
    let parser = MarkdownParser::default();

    let mut items: Vec<BatchItem<'_>> = (0..20)
      .map(|i| {
        BatchItem::new(
          parser.parse(&format!("[[n{}]]", (i + 1) % 20)),
          DocumentContext::for_note(Destination::Html, format!("n{i}"), Vault::new("v1")),
        )
      })
      .collect();
    // No vault: title insertion fails for this one only.
    items[3].context.vault = None;

    let results = process_batch(&processor, items);
    assert_eq!(results.len(), 20);
    assert!(results[3].is_err());
    for (i, result) in results.iter().enumerate().filter(|(i, _)| *i != 3) {
      let published = result.as_ref().unwrap();
      let doc = &published.document;
      let heading = doc.children(doc.root())[0];
      assert_eq!(doc.text_content(heading), format!("N{i}"));
    }
  }

  #[test]
  fn test_render_batch() {
    let index = index();
    let processor =
      PublishProcessor::new(&index, &SitePolicy, PublishOptions::default());
    let ctx = DocumentContext::new(Destination::Html);
    let sources = [("[[n1]]", ctx.clone()), ("*plain*", ctx)];

    let html = render_batch(&processor, &sources);
    assert_eq!(html[0].as_ref().unwrap().trim(), "<p><a href=\"n1.html\">n1</a></p>");
    assert_eq!(html[1].as_ref().unwrap().trim(), "<p><em>plain</em></p>");
  }
}
