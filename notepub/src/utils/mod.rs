//! Small helpers shared across the pipeline.
use regex::Regex;

/// Slugify a string for use as an anchor ID.
/// Converts to lowercase, replaces non-alphanumeric characters with dashes,
/// collapses runs of dashes and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  let replaced = text
    .trim()
    .to_lowercase()
    .replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_', "-");

  let mut slug = String::with_capacity(replaced.len());
  for c in replaced.chars() {
    if c == '-' && slug.ends_with('-') {
      continue;
    }
    slug.push(c);
  }
  slug.trim_matches('-').to_string()
}

/// Whether a heading with text `heading` is the target of `anchor`.
///
/// Anchors are compared by slug, so `#Getting Started` and
/// `#getting-started` both match a "Getting Started" heading.
#[must_use]
pub fn anchor_matches(heading: &str, anchor: &str) -> bool {
  slugify(heading) == slugify(anchor)
}

/// Join an asset prefix and URL with exactly one slash in front and one
/// between them: `("bond/", "/image.jpg")` -> `/bond/image.jpg`.
#[must_use]
pub fn join_asset_path(prefix: &str, url: &str) -> String {
  format!("/{}/{}", prefix.trim_matches('/'), url.trim_matches('/'))
}

/// Create a regex that never matches anything.
///
/// Used as a fallback for static patterns that fail to compile, so a broken
/// pattern degrades to "no matches" instead of a panic.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}
