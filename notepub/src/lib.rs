//! # notepub - publish-time transformation of note trees
//!
//! Takes a parsed markdown note and rewrites it for publishing: wiki-links
//! become real hrefs (or a forbidden page when the target must stay private),
//! note references are replaced by the referenced note's content, image URLs
//! get the site's asset prefix and the note's title can be inserted as a
//! heading.
//!
//! ## Quick Start
//!
//! ```rust
//! use notepub::{
//!   Destination,
//!   DocumentContext,
//!   NoteIndex,
//!   NoteProps,
//!   PublishProcessor,
//!   SitePolicy,
//!   Vault,
//! };
//! use notepub_config::PublishOptions;
//!
//! let vault = Vault::new("vaults/main");
//! let notes = NoteIndex::from_notes(vec![vault.clone()], [
//!   NoteProps::new("bar-id", "bar", vault.clone()),
//! ]);
//!
//! let processor =
//!   PublishProcessor::new(&notes, &SitePolicy, PublishOptions::default());
//! let ctx = DocumentContext::new(Destination::Html);
//! let result = processor.render("See [[the bar note|bar]].", &ctx).unwrap();
//!
//! assert_eq!(
//!   result.html,
//!   "<p>See <a href=\"bar.html\">the bar note</a>.</p>\n"
//! );
//! assert!(result.errors.is_empty());
//! ```
//!
//! ## Publish policy
//!
//! With `enforce_publish_policy`, every link is checked against a
//! [`PublishPolicy`]. Links to notes that may not be published point at
//! `403.html`:
//!
//! ```rust
//! use notepub::{
//!   Destination,
//!   DocumentContext,
//!   NoteIndex,
//!   NoteProps,
//!   PublishProcessor,
//!   SitePolicy,
//!   Vault,
//! };
//! use notepub_config::{PublishOptionsBuilder, SiteConfig};
//!
//! let vault = Vault::new("vaults/main");
//! let notes = NoteIndex::from_notes(vec![vault.clone()], [
//!   NoteProps::new("bar-id", "bar", vault.clone()),
//! ]);
//! let site = SiteConfig::with_hierarchies(["foo"]);
//! let options = PublishOptionsBuilder::new()
//!   .enforce_publish_policy(true)
//!   .use_id(true)
//!   .build();
//!
//! let processor = PublishProcessor::new(&notes, &SitePolicy, options);
//! let ctx = DocumentContext::new(Destination::Html).with_config(&site);
//! let result = processor.render("[[an alias|bar]]", &ctx).unwrap();
//!
//! assert_eq!(result.html, "<p><a href=\"403.html\">an alias</a></p>\n");
//! ```
//!
//! ## Errors
//!
//! Problems with individual links and references are collected in an
//! [`ErrorSink`] and never abort processing. Only title insertion without
//! enough context to find the note is fatal and returned as a
//! [`PublishError`].
pub mod ast;
pub mod engine;
pub mod error;
pub mod parser;
pub mod policy;
pub mod processor;
pub mod reference;
pub mod render;
pub mod utils;

pub use crate::{
  ast::{Alignment, Document, NodeId, NodeKind, RenderHints},
  engine::{NoteIndex, NoteLookup, NoteProps, Vault, Visibility},
  error::{ErrorKind, ErrorRecord, ErrorSink, PublishError, ResolutionError},
  parser::MarkdownParser,
  policy::{PublishPolicy, SitePolicy},
  processor::{
    BatchItem,
    Destination,
    DocumentContext,
    Header,
    Published,
    PublishProcessor,
    RenderedNote,
    process_batch,
    render_batch,
  },
  reference::NoteReference,
  render::HtmlRenderer,
};
