#![allow(deprecated)]
use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small site: two nested notes, a private note, one published post and one draft.
fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "garden.toml",
        "site_url = \"https://garden.test\"\nsite_title = \"Test Garden\"\nstatic_pages = [\"/\"]\n",
    );
    write(
        root,
        "src/content/writing/rust.md",
        "---\ntitle: Rust\ntags:\n  - rust\n---\nSee [[tokio]] for async.\n",
    );
    write(
        root,
        "src/content/writing/tokio.md",
        "---\ntitle: Tokio\nparent: rust\ntags:\n  - rust\n  - async\n---\nAn async runtime.\n",
    );
    write(
        root,
        "src/content/writing/hello-world.md",
        "---\ntitle: Hello World\ndate: 2024-01-15\ntags:\n  - post\n---\nFirst post.\n",
    );
    write(
        root,
        "src/content/writing/private/diary.md",
        "---\ntitle: Diary\n---\nSecret.\n",
    );
    write(
        root,
        "src/content/drafts/idea.md",
        "---\ntitle: An Idea\n---\nNot yet.\n",
    );
    dir
}

fn garden(root: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("garden"));
    cmd.arg("--root").arg(root).arg("--no-git");
    cmd
}

#[test]
fn build_summarizes_the_site() {
    let dir = site();
    garden(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build"))
        .stdout(predicate::str::contains("development"));
}

#[test]
fn list_json_includes_every_kind() {
    let dir = site();
    garden(dir.path())
        .args(["list", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"rust\""))
        .stdout(predicate::str::contains("\"id\": \"hello-world\""))
        .stdout(predicate::str::contains("\"id\": \"idea\""));
}

#[test]
fn production_redacts_private_notes() {
    let dir = site();
    garden(dir.path())
        .args(["list", "--kind", "notes", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"private/diary\""));

    garden(dir.path())
        .args(["list", "--kind", "notes", "--output", "json", "--production"])
        .assert()
        .success()
        .stdout(predicate::str::contains("private/diary").not())
        .stdout(predicate::str::contains("\"id\": \"tokio\""));
}

#[test]
fn list_without_matches_says_so() {
    let dir = site();
    garden(dir.path())
        .args(["list", "--kind", "bookmarks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries."));
}

#[test]
fn tree_nests_children() {
    let dir = site();
    garden(dir.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("└ Tokio"));
}

#[test]
fn filter_narrows_by_tag() {
    let dir = site();
    // The notes page lists root notes and drafts: rust, private/diary and idea.
    garden(dir.path())
        .args(["filter", "rust", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"href\": \"/rust/\""))
        .stdout(predicate::str::contains("\"all\": 3"))
        .stdout(predicate::str::contains("\"filtered\": 1"));
}

#[test]
fn sitemap_lists_pages_posts_and_notes() {
    let dir = site();
    garden(dir.path())
        .arg("sitemap")
        .assert()
        .success()
        .stdout(predicate::str::contains("<loc>https://garden.test/</loc>"))
        .stdout(predicate::str::contains("<loc>https://garden.test/hello-world/</loc>"))
        .stdout(predicate::str::contains("<loc>https://garden.test/tokio/</loc>"));
}

#[test]
fn rss_contains_published_posts() {
    let dir = site();
    garden(dir.path())
        .arg("rss")
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>Test Garden</title>"))
        .stdout(predicate::str::contains("<title>Hello World</title>"))
        .stdout(predicate::str::contains("An Idea").not());
}

#[test]
fn render_expands_wiki_links() {
    let dir = site();
    garden(dir.path())
        .args(["render", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<a href=\"/tokio/\">tokio</a>"));
}

#[test]
fn render_unknown_entry_fails() {
    let dir = site();
    garden(dir.path())
        .args(["render", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Entry not found: missing"));
}

#[test]
fn cdn_show_without_snapshot_fails() {
    let dir = site();
    garden(dir.path())
        .args(["cdn", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
