#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
mod common;

use common::{main_vault, other_vault, site, workspace};
use notepub::{
  Destination,
  DocumentContext,
  ErrorKind,
  NodeKind,
  NoteProps,
  PublishProcessor,
  RenderedNote,
  SitePolicy,
};
use notepub_config::{PublishOptions, PublishOptionsBuilder, SiteConfig};

fn page<'a>() -> DocumentContext<'a> {
  DocumentContext::for_note(Destination::Html, "page", main_vault())
}

fn render(options: PublishOptions, markdown: &str) -> RenderedNote {
  let notes = workspace();
  PublishProcessor::new(&notes, &SitePolicy, options)
    .render(markdown, &page())
    .expect("processing should succeed")
}

#[test]
fn test_block_reference_replaces_paragraph() {
  let result = render(PublishOptions::default(), "before\n\n![[foo.ch1]]\n\nafter");
  assert_eq!(
    result.html,
    "<p>before</p>\n<p>chapter one text</p>\n<p>after</p>\n"
  );
  assert!(result.errors.is_empty());
}

#[test]
fn test_legacy_reference() {
  let result = render(PublishOptions::default(), "((ref: [[foo.ch1]]))");
  assert_eq!(result.html, "<p>chapter one text</p>\n");
}

#[test]
fn test_inline_reference_is_inlined() {
  let result = render(PublishOptions::default(), "see ![[foo.ch1]] here");
  assert_eq!(result.html, "<p>see chapter one text here</p>\n");
}

#[test]
fn test_inline_reference_to_blocks_splits_paragraph() {
  let result = render(PublishOptions::default(), "see ![[foo]] here");
  assert_eq!(
    result.html,
    "<p>see </p>\n<h1 id=\"foo-intro\">Foo Intro</h1>\n<p>foo text <a \
     href=\"foo.ch1.html\">foo.ch1</a></p>\n<h2 id=\"details\">Details</h2>\n<p>detail \
     text</p>\n<p> here</p>\n"
  );

  let result = render(PublishOptions::default(), "![[foo#details]] after");
  assert_eq!(
    result.html,
    "<h2 id=\"details\">Details</h2>\n<p>detail text</p>\n<p> after</p>\n"
  );
}

#[test]
fn test_split_paragraph_keeps_tree_well_formed() {
  let notes = workspace();
  let published = PublishProcessor::new(&notes, &SitePolicy, PublishOptions::default())
    .process_markdown("see ![[foo]] here", &page())
    .expect("processing should succeed");

  let doc = &published.document;
  for id in doc.descendants(doc.root()) {
    if doc.kind(id) == &NodeKind::Paragraph {
      for &child in doc.children(id) {
        assert!(!matches!(
          doc.kind(child),
          NodeKind::Paragraph | NodeKind::Heading { .. }
        ));
      }
    }
  }
  let kinds: Vec<&str> = doc
    .children(doc.root())
    .iter()
    .map(|&c| doc.kind(c).name())
    .collect();
  assert_eq!(kinds, vec![
    "paragraph",
    "heading",
    "paragraph",
    "heading",
    "paragraph",
    "paragraph"
  ]);
}

#[test]
fn test_header_range() {
  let result = render(PublishOptions::default(), "![[foo#details]]");
  assert_eq!(
    result.html,
    "<h2 id=\"details\">Details</h2>\n<p>detail text</p>\n"
  );

  let result = render(PublishOptions::default(), "![[foo#foo-intro:#details]]");
  assert_eq!(
    result.html,
    "<h1 id=\"foo-intro\">Foo Intro</h1>\n<p>foo text <a \
     href=\"foo.ch1.html\">foo.ch1</a></p>\n"
  );
}

#[test]
fn test_unknown_heading_degrades_to_link() {
  let result = render(PublishOptions::default(), "![[foo#nowhere]]");
  assert_eq!(result.html, "<a href=\"foo.html#nowhere\">foo</a>");
  assert_eq!(result.errors.count(ErrorKind::NotFound), 1);
  let record = result.errors.iter().next().expect("one error");
  assert_eq!(record.message, "no heading `nowhere` in note `foo`");
}

#[test]
fn test_links_inside_are_rewritten() {
  let options = PublishOptionsBuilder::new().use_id(true).build();
  let result = render(options, "![[foo]]");
  assert!(result.html.contains("<a href=\"foo-ch1-id.html\">foo-ch1-id</a>"));
  assert_eq!(result.headers.len(), 2);
}

#[test]
fn test_links_inside_follow_the_referenced_note_vault() {
  let mut notes = workspace();
  notes.insert(NoteProps::new("host-id", "host", other_vault()).with_body("[[bar]]"));
  let options = PublishOptionsBuilder::new().use_id(true).build();

  // `host` lives in the other vault, so `[[bar]]` inside it resolves there.
  let result = PublishProcessor::new(&notes, &SitePolicy, options)
    .render("![[host]]", &page())
    .expect("processing should succeed");
  assert_eq!(
    result.html,
    "<p><a href=\"bar-other-id.html\">bar-other-id</a></p>\n"
  );
}

#[test]
fn test_mutual_references_terminate() {
  let notes = workspace();
  let processor =
    PublishProcessor::new(&notes, &SitePolicy, PublishOptions::default());
  let ctx = DocumentContext::for_note(Destination::Html, "cycle.a", main_vault());

  let result = processor
    .render("a text\n\n![[cycle.b]]\n", &ctx)
    .expect("processing should succeed");
  assert_eq!(result.errors.count(ErrorKind::CyclicReference), 1);
  assert_eq!(
    result.html,
    "<p>a text</p>\n<p>b text</p>\n<a href=\"cycle.a.html\">cycle.a</a>"
  );
}

#[test]
fn test_cycle_below_an_anonymous_document() {
  let result = {
    let notes = workspace();
    PublishProcessor::new(&notes, &SitePolicy, PublishOptions::default())
      .render("![[cycle.a]]", &DocumentContext::new(Destination::Html))
      .expect("processing should succeed")
  };
  assert_eq!(result.errors.len(), 1);
  let record = result.errors.iter().next().expect("one error");
  assert_eq!(record.kind, ErrorKind::CyclicReference);
  assert_eq!(
    record.message,
    "cyclic note reference: cycle.a -> cycle.b -> cycle.a"
  );
}

#[test]
fn test_self_reference() {
  let notes = workspace();
  let processor =
    PublishProcessor::new(&notes, &SitePolicy, PublishOptions::default());
  let ctx = DocumentContext::for_note(Destination::Html, "selfref", main_vault());

  let result = processor
    .render("me\n\n![[selfref]]\n", &ctx)
    .expect("processing should succeed");
  assert_eq!(result.errors.count(ErrorKind::CyclicReference), 1);
  assert_eq!(result.html, "<p>me</p>\n<a href=\"selfref.html\">selfref</a>");
}

#[test]
fn test_wildcard_reference() {
  let result = render(PublishOptions::default(), "![[foo.*]]");
  assert_eq!(
    result.html,
    "<p>chapter one text</p>\n<p>chapter two text</p>\n<p>draft \
     text</p>\n<p>classified text</p>\n"
  );
}

#[test]
fn test_wildcard_respects_publish_policy() {
  let notes = workspace();
  let config = site(&["foo"]);
  let options = PublishOptionsBuilder::new()
    .enforce_publish_policy(true)
    .build();
  let processor = PublishProcessor::new(&notes, &SitePolicy, options);

  let result = processor
    .render("![[foo.*]]", &page().with_config(&config))
    .expect("processing should succeed");
  assert_eq!(
    result.html,
    "<p>chapter one text</p>\n<p>chapter two text</p>\n"
  );
  assert!(result.errors.is_empty());
}

#[test]
fn test_denied_reference_becomes_forbidden_link() {
  let notes = workspace();
  let config = site(&["foo"]);
  let options = PublishOptionsBuilder::new()
    .enforce_publish_policy(true)
    .build();
  let processor = PublishProcessor::new(&notes, &SitePolicy, options);

  let result = processor
    .render("![[foo.secret]]", &page().with_config(&config))
    .expect("processing should succeed");
  assert_eq!(result.html, "<a href=\"403.html\">403</a>");
  assert!(result.errors.is_empty());
}

#[test]
fn test_pretty_refs() {
  let result = render(
    PublishOptionsBuilder::new().pretty_refs(true).build(),
    "![[foo.ch1]]",
  );
  assert_eq!(
    result.html,
    "<div class=\"portal-container\"><div class=\"portal-head\"><a \
     class=\"portal-arrow\" href=\"foo.ch1.html\">Chapter \
     One</a></div>\n<div class=\"portal-parent\"><p>chapter one \
     text</p>\n</div>\n</div>\n"
  );
}

#[test]
fn test_pretty_refs_from_site_config() {
  let notes = workspace();
  let config = SiteConfig {
    use_pretty_refs: Some(true),
    ..SiteConfig::default()
  };
  let processor =
    PublishProcessor::new(&notes, &SitePolicy, PublishOptions::default());
  let published = processor
    .process_markdown("![[foo.ch1]]", &page().with_config(&config))
    .expect("processing should succeed");

  let doc = &published.document;
  let first = doc.children(doc.root())[0];
  assert!(matches!(doc.kind(first), NodeKind::Element { tag, .. } if tag == "div"));
}

#[test]
fn test_every_expanded_node_is_reachable() {
  let options = PublishOptionsBuilder::new().pretty_refs(true).build();
  let notes = workspace();
  let published = PublishProcessor::new(&notes, &SitePolicy, options)
    .process_markdown("![[foo.*]]\n\n![[foo]]", &page())
    .expect("processing should succeed");

  let doc = &published.document;
  for id in doc.descendants(doc.root()) {
    assert!(doc.is_attached(id));
    for &child in doc.children(id) {
      assert_eq!(doc.parent(child), Some(id));
    }
  }
}
