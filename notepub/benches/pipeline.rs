#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in benchmarks"
)]
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use notepub::{
  BatchItem,
  Destination,
  DocumentContext,
  MarkdownParser,
  NoteIndex,
  NoteProps,
  PublishProcessor,
  SitePolicy,
  Vault,
  process_batch,
};
use notepub_config::{PublishOptionsBuilder, SiteConfig};

const NOTE_COUNT: usize = 200;

/// A workspace of `NOTE_COUNT` notes, each linking to and referencing its
/// neighbours.
fn workspace() -> NoteIndex {
  let vault = Vault::new("vaults/bench");
  NoteIndex::from_notes(
    vec![vault.clone()],
    (0..NOTE_COUNT).map(|i| {
      let next = (i + 1) % NOTE_COUNT;
      NoteProps::new(format!("id-{i}"), format!("notes.n{i}"), vault.clone())
        .with_body(format!(
          "# Section\n\nSee [[notes.n{next}]] and [[Alias|notes.n{next}#section]].\n\n\
           ![image](img/n{i}.png)\n\n## Details\n\nSome *details* for note {i}.\n"
        ))
    }),
  )
}

fn document(i: usize) -> String {
  let next = (i + 1) % NOTE_COUNT;
  format!(
    "---\nid: id-{i}\n---\n\nIntro with [[notes.n{next}]].\n\n![[notes.n{next}#details]]\n"
  )
}

fn bench_single_document(c: &mut Criterion) {
  let mut group = c.benchmark_group("single_document");
  let notes = workspace();
  let site = SiteConfig::with_hierarchies(["notes"]);
  let vault = Vault::new("vaults/bench");
  let markdown = document(0);

  let plain = PublishProcessor::new(
    &notes,
    &SitePolicy,
    PublishOptionsBuilder::new().build(),
  );
  let enforcing = PublishProcessor::new(
    &notes,
    &SitePolicy,
    PublishOptionsBuilder::new()
      .enforce_publish_policy(true)
      .use_id(true)
      .insert_title(true)
      .assets_prefix(Some("assets"))
      .build(),
  );
  let ctx = DocumentContext::for_note(Destination::Html, "notes.n0", vault)
    .with_config(&site);

  group.bench_with_input(BenchmarkId::new("render", "plain"), &markdown, |b, md| {
    b.iter(|| plain.render(black_box(md), black_box(&ctx)).unwrap());
  });
  group.bench_with_input(
    BenchmarkId::new("render", "enforcing"),
    &markdown,
    |b, md| {
      b.iter(|| enforcing.render(black_box(md), black_box(&ctx)).unwrap());
    },
  );

  group.finish();
}

fn bench_batch(c: &mut Criterion) {
  let mut group = c.benchmark_group("batch");
  let notes = workspace();
  let site = SiteConfig::with_hierarchies(["notes"]);
  let vault = Vault::new("vaults/bench");
  let parser = MarkdownParser::default();
  let processor = PublishProcessor::new(
    &notes,
    &SitePolicy,
    PublishOptionsBuilder::new()
      .enforce_publish_policy(true)
      .build(),
  );

  for size in [10, NOTE_COUNT] {
    let items: Vec<BatchItem<'_>> = (0..size)
      .map(|i| {
        BatchItem::new(
          parser.parse(&document(i)),
          DocumentContext::for_note(
            Destination::Html,
            format!("notes.n{i}"),
            vault.clone(),
          )
          .with_config(&site),
        )
      })
      .collect();

    group.bench_with_input(BenchmarkId::new("process_batch", size), &items, |b, items| {
      b.iter(|| process_batch(&processor, black_box(items.clone())));
    });
  }

  group.finish();
}

criterion_group!(benches, bench_single_document, bench_batch);
criterion_main!(benches);
