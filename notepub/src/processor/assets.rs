//! Image URL prefixing.
use crate::{
  ast::{Document, NodeId, NodeKind},
  utils::join_asset_path,
};

/// Prefix the URL of the image at `node` with `prefix`.
///
/// Not idempotent: running it twice prefixes twice.
pub(crate) fn rewrite_image(document: &mut Document, node: NodeId, prefix: &str) {
  if let NodeKind::Image { url, .. } = &mut document.node_mut(node).kind {
    let rewritten = join_asset_path(prefix, url);
    log::trace!("Rewriting image {url} -> {rewritten}");
    *url = rewritten;
  }
}
