//! End-to-end CLI tests using `assert_cmd`.
//!
//! These tests invoke the compiled binary against a small corpus written to a
//! temp dir. They never touch the user's config file or the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const CORPUS: &str = r#"doc_id,title,sent_id,sent,links
cat,Cataract,0,A cataract is a clouding of the lens.,
cat,Cataract,1,It makes vision blurry.,"{'CONSEQUENCE_IS': [{'linked_doc_id': 'surg', 'linked_sent_id': 1, 'linked_keywords': 'surgery helps you see', 'dist': 0.42}], 'SIMILARLY': [{'linked_doc_id': 'surg', 'linked_sent_id': 0, 'linked_keywords': 'eye surgery', 'dist': 0.9}], 'CAUSE_IS': None}"
cat,Cataract,2,- treat with surgery,
cat,Cataract,3,Ask your doctor.,not a mapping
surg,Eye surgery,0,Surgery replaces the lens.,
surg,Eye surgery,1,Surgery helps you see clearly again.,
surg,Eye surgery,2,Recovery takes weeks.,"{'FOR_EXAMPLE': [{'linked_doc_id': 'cat', 'linked_sent_id': 0, 'linked_keywords': 'a cataract is a clouding of the lens', 'dist': 0.3}]}"
"#;

const SURGERY_LEAF: &str = "surg|1|#006400|surgery helps you see";
/// Leaf whose label wraps over two lines, typed on one
const CATARACT_LEAF: &str = "cat|0|#FF8C00|a cataract is a clouding of the lens";

struct Fixture {
    dir: TempDir,
    data: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let data = dir.path().join("sentences.csv");
        fs::write(&data, CORPUS).unwrap();
        Self { dir, data }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Command with the fixture corpus and no config file
    fn cmd(&self) -> Command {
        let mut cmd = bare_cmd(&self.path("absent.toml"));
        cmd.arg("--data").arg(&self.data);
        cmd
    }
}

fn bare_cmd(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("textmagnet").unwrap();
    cmd.env_remove("TEXTMAGNET_DATA")
        .env_remove("TEXTMAGNET_MAX_DISTANCE")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

// ─── Help / version ─────────────────────────────────────────────────────

#[test]
fn test_help_shows_commands() {
    Command::cargo_bin("textmagnet")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("titles"))
        .stdout(predicate::str::contains("read"))
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("excerpt"))
        .stdout(predicate::str::contains("explore"))
        .stdout(predicate::str::contains("--data"));
}

#[test]
fn test_version_shows_name() {
    Command::cargo_bin("textmagnet")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("textmagnet"));
}

// ─── Init ───────────────────────────────────────────────────────────────

#[test]
fn test_init_writes_config_once() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nested").join("config.toml");

    bare_cmd(&config).arg("init").assert().success();
    let content = fs::read_to_string(&config).unwrap();
    assert!(content.contains("words_per_line = 4"));
    assert!(content.contains("cache_ttl_secs = 420"));

    bare_cmd(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ─── Data source errors ─────────────────────────────────────────────────

#[test]
fn test_missing_source_is_reported() {
    let dir = tempdir().unwrap();
    bare_cmd(&dir.path().join("absent.toml"))
        .arg("titles")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data source configured"));
}

#[test]
fn test_unreadable_source_fails() {
    let dir = tempdir().unwrap();
    bare_cmd(&dir.path().join("absent.toml"))
        .args(["--data", "/definitely/not/here.csv", "titles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load data"));
}

#[test]
fn test_source_from_config_file() {
    let fixture = Fixture::new();
    let config = fixture.path("config.toml");
    fs::write(&config, format!("source = {:?}\n", fixture.data.display().to_string())).unwrap();

    bare_cmd(&config)
        .arg("titles")
        .assert()
        .success()
        .stdout(predicate::str::contains("Eye surgery"));
}

// ─── Titles ─────────────────────────────────────────────────────────────

#[test]
fn test_titles_sorted() {
    let fixture = Fixture::new();
    let output = fixture.cmd().arg("titles").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();

    let cataract = stdout.find("Cataract").unwrap();
    let surgery = stdout.find("Eye surgery").unwrap();
    assert!(cataract < surgery);
}

#[test]
fn test_titles_filter() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["titles", "--filter", "^eye"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Eye surgery"))
        .stdout(predicate::str::contains("Cataract").not());
}

#[test]
fn test_titles_rejects_invalid_regex() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["titles", "--filter", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --filter pattern"));
}

// ─── Read ───────────────────────────────────────────────────────────────

#[test]
fn test_read_renders_clickable_document() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["read", "Cataract"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<h2>Cataract</h2>"))
        .stdout(predicate::str::contains("id='cat|1'"))
        .stdout(predicate::str::contains("<br>- treat with surgery<br>"));
}

#[test]
fn test_read_highlight_to_file() {
    let fixture = Fixture::new();
    let out = fixture.path("cataract.html");
    fixture
        .cmd()
        .args(["read", "Cataract", "--highlight", "1", "--output"])
        .arg(&out)
        .assert()
        .success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("<mark"));
    assert!(html.contains("It makes vision blurry."));
}

#[test]
fn test_read_unknown_title() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["read", "Glaucoma"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Related text not found"));
}

#[test]
fn test_max_distance_removes_anchor() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["--max-distance", "0.1", "read", "Cataract"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<a ").not());
}

// ─── Graph ──────────────────────────────────────────────────────────────

#[test]
fn test_graph_prints_tree() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["graph", "cat", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CONSEQUENCES"))
        .stdout(predicate::str::contains("SIMILARITIES"))
        .stdout(predicate::str::contains(SURGERY_LEAF));
}

#[test]
fn test_graph_respects_max_distance() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["graph", "cat", "1", "--max-distance", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CONSEQUENCES"))
        .stdout(predicate::str::contains("SIMILARITIES").not());
}

#[test]
fn test_graph_without_links() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["graph", "cat", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No related ideas"));
}

#[test]
fn test_graph_json_export() {
    let fixture = Fixture::new();
    let out = fixture.path("graph.json");
    fixture
        .cmd()
        .args(["graph", "cat", "1", "--format", "json", "--output"])
        .arg(&out)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(value["nodes"][0]["tooltip"], "It makes vision blurry.");
}

#[test]
fn test_graph_graphml_to_stdout() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["graph", "cat", "1", "--format", "graphml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains("</graphml>"));
}

#[test]
fn test_graph_rejects_invalid_format() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["graph", "cat", "1", "--format", "dot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_graph_unknown_sentence() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["graph", "cat", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Related text not found"));
}

// ─── Excerpt ────────────────────────────────────────────────────────────

#[test]
fn test_excerpt_for_leaf() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["excerpt", SURGERY_LEAF])
        .assert()
        .success()
        .stdout(predicate::str::contains("«Surgery replaces the lens. <mark"))
        .stdout(predicate::str::contains("id='surg'>Eye surgery</a>"))
        .stdout(predicate::str::contains("color: #006400"));
}

#[test]
fn test_excerpt_malformed_key() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["excerpt", "surg|1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed reference"));
}

// ─── Viz ────────────────────────────────────────────────────────────────

#[test]
fn test_viz_writes_page() {
    let fixture = Fixture::new();
    let out = fixture.path("viz.html");
    fixture
        .cmd()
        .args(["viz", "cat", "1", "--no-open", "--output"])
        .arg(&out)
        .assert()
        .success();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("vis-network"));
    assert!(html.contains("CONSEQUENCE_IS"));
}

// ─── Stats ──────────────────────────────────────────────────────────────

#[test]
fn test_stats_counts_corpus() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Documents:        2"))
        .stdout(predicate::str::contains("Sentences:        7"))
        .stdout(predicate::str::contains("CONSEQUENCES"))
        .stdout(predicate::str::contains("1 malformed link entries"));
}

// ─── Explore ────────────────────────────────────────────────────────────

#[test]
fn test_explore_session() {
    let fixture = Fixture::new();
    let html = fixture.path("explore.html");
    let script = format!(
        "open Cataract\nclick cat|1\nnode {}\nfollow\nhistory\nquit\n",
        SURGERY_LEAF
    );

    fixture
        .cmd()
        .arg("explore")
        .arg("--html")
        .arg(&html)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("CONSEQUENCES"))
        .stdout(predicate::str::contains("Surgery helps you see clearly again."))
        .stdout(predicate::str::contains("[1] Cataract"));

    let page = fs::read_to_string(&html).unwrap();
    assert!(page.contains("<h2>Eye surgery</h2>"));
}

#[test]
fn test_explore_reports_and_continues() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("explore")
        .write_stdin("click cat|1\nopen Glaucoma\njump\nopen Eye surgery\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cannot open a sentence while idle"))
        .stdout(predicate::str::contains("Related text not found: title 'Glaucoma'"))
        .stdout(predicate::str::contains("Unknown command 'jump'"))
        .stdout(predicate::str::contains("Recovery takes weeks."));
}

#[test]
fn test_explore_opens_wrapped_leaf_by_number() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("explore")
        .write_stdin("open Eye surgery\nclick surg|2\nnode 1\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. a cataract is a clouding of the lens"))
        .stdout(predicate::str::contains(CATARACT_LEAF))
        .stdout(predicate::str::contains("A cataract is a clouding of the lens."))
        .stdout(predicate::str::contains("(follow)"));
}

#[test]
fn test_explore_opens_wrapped_leaf_by_key() {
    let fixture = Fixture::new();
    let script = format!(
        "open Eye surgery\nclick surg|2\nnode {}\nfollow\nquit\n",
        CATARACT_LEAF
    );
    fixture
        .cmd()
        .arg("explore")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Related text not found").not())
        .stdout(predicate::str::contains("(follow)"))
        .stdout(predicate::str::contains("It makes vision blurry."));
}

#[test]
fn test_explore_unknown_node_continues() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("explore")
        .write_stdin(
            "open Cataract\nclick cat|1\nnode typo\nclick cat|1\nnode 7\nopen Eye surgery\nquit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Related text not found: graph node 'typo'"))
        .stdout(predicate::str::contains("Related text not found: graph node '7'"))
        .stdout(predicate::str::contains("Recovery takes weeks."));
}

#[test]
fn test_explore_titles_filter_is_regex() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("explore")
        .write_stdin("titles ^eye\ntitles (\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Eye surgery"))
        .stdout(predicate::str::contains("Invalid filter pattern"));
}
