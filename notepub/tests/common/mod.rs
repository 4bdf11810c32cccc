#![allow(dead_code, reason = "Not every test file uses every fixture")]
use notepub::{NoteIndex, NoteProps, Vault};
use notepub_config::SiteConfig;
use serde_json::json;

pub fn main_vault() -> Vault {
  Vault::new("vaults/main").with_name("main")
}

pub fn other_vault() -> Vault {
  Vault::new("vaults/other").with_name("other")
}

pub fn secret_vault() -> Vault {
  Vault::new("vaults/secret").with_name("secret").private()
}

pub const FOO_BODY: &str = "# Foo Intro\n\nfoo text [[foo.ch1]]\n\n## \
                            Details\n\ndetail text\n";

/// A small workspace of three vaults:
///
/// - `foo` and its children, one of them in a private vault and one opted out
///   of publishing,
/// - `bar`, present in both public vaults,
/// - `cycle.a` and `cycle.b` referencing each other, and `selfref`
///   referencing itself.
pub fn workspace() -> NoteIndex {
  let main = main_vault();
  let other = other_vault();
  let secret = secret_vault();

  NoteIndex::from_notes(vec![main.clone(), other.clone(), secret.clone()], [
    NoteProps::new("foo-id", "foo", main.clone())
      .with_title("Foo")
      .with_body(FOO_BODY),
    NoteProps::new("foo-ch1-id", "foo.ch1", main.clone())
      .with_title("Chapter One")
      .with_body("chapter one text"),
    NoteProps::new("foo-ch2-id", "foo.ch2", other.clone())
      .with_title("Chapter Two")
      .with_body("chapter two text"),
    NoteProps::new("foo-draft-id", "foo.draft", main.clone())
      .with_body("draft text")
      .with_custom("published", json!(false)),
    NoteProps::new("foo-secret-id", "foo.secret", secret)
      .with_body("classified text"),
    NoteProps::new("bar-main-id", "bar", main.clone()).with_body("bar in main"),
    NoteProps::new("bar-other-id", "bar", other).with_body("bar in other"),
    NoteProps::new("cycle-a-id", "cycle.a", main.clone())
      .with_body("a text\n\n![[cycle.b]]\n"),
    NoteProps::new("cycle-b-id", "cycle.b", main.clone())
      .with_body("b text\n\n![[cycle.a]]\n"),
    NoteProps::new("selfref-id", "selfref", main)
      .with_body("me\n\n![[selfref]]\n"),
  ])
}

pub fn site(hierarchies: &[&str]) -> SiteConfig {
  SiteConfig::with_hierarchies(hierarchies.iter().copied())
}
