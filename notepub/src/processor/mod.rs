//! The publish pipeline.
//!
//! # Architecture
//!
//! - [`core`]: the [`PublishProcessor`] and its tree walker
//! - [`resolve`]: reference resolution with vault hints and tie-breaking
//! - [`links`]: wiki-link rewriting under the publish policy
//! - `refs`: note reference expansion
//! - `assets`: image URL prefixing
//! - `title`: title heading insertion
//! - [`process`]: batch helpers
//! - [`types`]: destinations, per-document context and results
mod assets;
pub mod core;
pub mod links;
pub mod process;
mod refs;
pub mod resolve;
mod title;
pub mod types;

pub use self::core::PublishProcessor;
pub use links::{FORBIDDEN_TARGET, note_href};
pub use process::{BatchItem, process_batch, render_batch};
pub use resolve::Resolver;
pub use types::{Destination, DocumentContext, Header, Published, RenderedNote};
