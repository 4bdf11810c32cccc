#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
mod common;

use common::workspace;
use notepub::{
  Destination,
  Document,
  DocumentContext,
  HtmlRenderer,
  MarkdownParser,
  PublishProcessor,
  SitePolicy,
};
use notepub_config::{PublishOptionsBuilder, PublishOverrides, SiteConfig};

fn render_image(prefix: Option<&str>, url: &str, dest: Destination) -> String {
  let notes = workspace();
  let options = PublishOptionsBuilder::new().assets_prefix(prefix).build();
  let processor = PublishProcessor::new(&notes, &SitePolicy, options);
  processor
    .render(&format!("![alt-text]({url})"), &DocumentContext::new(dest))
    .expect("processing should succeed")
    .html
}

#[test]
fn test_prefix_is_normalised() {
  for prefix in ["bond", "bond/", "/bond", "/bond/"] {
    for url in ["image-url.jpg", "/image-url.jpg"] {
      assert_eq!(
        render_image(Some(prefix), url, Destination::Html),
        "<p><img src=\"/bond/image-url.jpg\" alt=\"alt-text\" /></p>\n",
        "prefix {prefix:?} with url {url:?}"
      );
    }
  }
}

#[test]
fn test_nested_prefix() {
  assert_eq!(
    render_image(Some("/static/assets/"), "img/a.png", Destination::Html),
    "<p><img src=\"/static/assets/img/a.png\" alt=\"alt-text\" /></p>\n"
  );
}

#[test]
fn test_only_html_destination_is_rewritten() {
  for dest in [
    Destination::Markdown,
    Destination::DendronMarkdown,
    Destination::Preview,
  ] {
    assert_eq!(
      render_image(Some("bond"), "image-url.jpg", dest),
      "<p><img src=\"image-url.jpg\" alt=\"alt-text\" /></p>\n"
    );
  }
}

#[test]
fn test_no_prefix_leaves_url() {
  assert_eq!(
    render_image(None, "image-url.jpg", Destination::Html),
    "<p><img src=\"image-url.jpg\" alt=\"alt-text\" /></p>\n"
  );
  assert_eq!(
    render_image(Some(""), "image-url.jpg", Destination::Html),
    "<p><img src=\"image-url.jpg\" alt=\"alt-text\" /></p>\n"
  );
}

#[test]
fn test_rewriting_twice_is_not_idempotent() {
  let notes = workspace();
  let options = PublishOptionsBuilder::new()
    .assets_prefix(Some("bond"))
    .build();
  let processor = PublishProcessor::new(&notes, &SitePolicy, options);
  let ctx = DocumentContext::new(Destination::Html);

  let mut document: Document =
    MarkdownParser::default().parse("![alt-text](image-url.jpg)");
  processor
    .process(&mut document, &ctx)
    .expect("processing should succeed");
  let once = HtmlRenderer::new().render(&document);

  processor
    .process(&mut document, &ctx)
    .expect("processing should succeed");
  let twice = HtmlRenderer::new().render(&document);

  assert!(once.contains("src=\"/bond/image-url.jpg\""));
  assert!(twice.contains("src=\"/bond/bond/image-url.jpg\""));
  assert_ne!(once, twice);
}

#[test]
fn test_prefix_sources_in_order() {
  let notes = workspace();
  let site = SiteConfig {
    assets_prefix: Some("site".to_string()),
    ..SiteConfig::default()
  };
  let markdown = "![alt-text](a.png)";

  // Site config is the fallback.
  let processor = PublishProcessor::new(
    &notes,
    &SitePolicy,
    PublishOptionsBuilder::new().build(),
  );
  let ctx = DocumentContext::new(Destination::Html).with_config(&site);
  let html = processor.render(markdown, &ctx).expect("render").html;
  assert!(html.contains("src=\"/site/a.png\""));

  // Processor options beat the site config.
  let processor = PublishProcessor::new(
    &notes,
    &SitePolicy,
    PublishOptionsBuilder::new().assets_prefix(Some("opts")).build(),
  );
  let html = processor.render(markdown, &ctx).expect("render").html;
  assert!(html.contains("src=\"/opts/a.png\""));

  // Per-call overrides beat both.
  let ctx = ctx.with_overrides(PublishOverrides {
    assets_prefix: Some("call".to_string()),
    ..Default::default()
  });
  let html = processor.render(markdown, &ctx).expect("render").html;
  assert!(html.contains("src=\"/call/a.png\""));
}
