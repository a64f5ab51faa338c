use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_ladoc")))
}

const FOO: &str = "<?php
/**
 * @namespace App
 */

/**
 * A foo.
 *
 * @class Foo
 */
class Foo
{
    /**
     * Run it.
     *
     * @method run
     * @param int $n How many times
     * @return bool
     */
    public function run($n) {}
}
";

fn write(dir: &TempDir, name: &str, content: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> serde_json::Value {
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

// -- output --

#[test]
fn dumps_tree_to_stdout() {
    let dir = TempDir::new().unwrap();
    write(&dir, "foo.php", FOO);

    let assert = cmd()
        .current_dir(dir.path())
        .arg("foo.php")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let json = stdout_json(&assert);
    let foo = &json["tree"]["App"]["Foo"];
    assert_eq!(foo["file"], "foo.php");
    assert_eq!(foo["line"], 11);
    assert_eq!(foo["text"], "A foo.");
    let run = &foo["methods"]["run"];
    assert_eq!(run["tags"]["param"][0]["name"], "$n");
    assert_eq!(run["tags"]["param"][0]["text"], "How many times");
    assert_eq!(run["tags"]["return"][0]["type"], "bool");
    assert_eq!(json["diagnostics"], serde_json::json!([]));
}

#[test]
fn writes_output_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "foo.php", FOO);

    cmd()
        .current_dir(dir.path())
        .args(["foo.php", "-o", "tree.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(dir.path().join("tree.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert!(json["tree"]["App"]["Foo"].is_object());
}

// -- diagnostics --

#[test]
fn unknown_tag_is_a_warning() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.php", "/**\n * @class A\n * @bogus thing\n */\n");

    let assert = cmd()
        .current_dir(dir.path())
        .arg("a.php")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "warning: a.php:3: Unknown tag @bogus.",
        ));

    let json = stdout_json(&assert);
    assert_eq!(json["diagnostics"][0]["kind"], "unknown-tag");
    assert_eq!(json["diagnostics"][0]["template"], "Unknown tag @%s.");
    assert!(json["tree"][""]["A"].is_object());
}

#[test]
fn quiet_hides_warnings() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.php", "/**\n * @method orphan\n */\n");

    cmd()
        .current_dir(dir.path())
        .args(["--quiet", "a.php"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("outside-class"));
}

#[test]
fn deny_warnings_fails_the_run() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.php", "/**\n * @param int\n * @class A\n */\n");

    cmd()
        .current_dir(dir.path())
        .args(["--deny-warnings", "a.php"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing argument 'name' for tag @param."))
        .stderr(predicate::str::contains("--deny-warnings is set"));
}

#[test]
fn deny_warnings_passes_clean_input() {
    let dir = TempDir::new().unwrap();
    write(&dir, "foo.php", FOO);

    cmd()
        .current_dir(dir.path())
        .args(["--deny-warnings", "foo.php"])
        .assert()
        .success();
}

// -- grammar --

#[test]
fn custom_grammar_extends_builtin_tags() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.php", "/**\n * @class A\n * @since 2.1\n */\n");

    let mut grammar = NamedTempFile::new().unwrap();
    grammar
        .write_all(br#"{"extend": true, "tags": {"since": "version:string"}}"#)
        .unwrap();

    let assert = cmd()
        .current_dir(dir.path())
        .arg("a.php")
        .arg("--grammar")
        .arg(grammar.path())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let json = stdout_json(&assert);
    assert_eq!(json["tree"][""]["A"]["tags"]["since"]["version"], "2.1");
}

#[test]
fn bad_grammar_aborts() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.php", "/**\n * @class A\n */\n");

    let mut grammar = NamedTempFile::new().unwrap();
    grammar
        .write_all(br#"{"tags": {"since": "version:semver"}}"#)
        .unwrap();

    cmd()
        .current_dir(dir.path())
        .arg("a.php")
        .arg("-g")
        .arg(grammar.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown parameter kind 'semver'"));
}

#[test]
fn missing_grammar_file_aborts() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.php", "");

    cmd()
        .current_dir(dir.path())
        .args(["a.php", "-g", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read grammar file nope.json"));
}

// -- input expansion --

#[test]
fn scans_directories_by_extension() {
    let dir = TempDir::new().unwrap();
    write(&dir, "src/a.php", "/**\n * @class A\n */\n");
    write(&dir, "src/nested/b.inc", "/**\n * @class B\n */\n");
    write(&dir, "src/notes.txt", "/**\n * @class Skipped\n */\n");

    let assert = cmd()
        .current_dir(dir.path())
        .args(["src", "--ext", "php,inc"])
        .assert()
        .success();

    let json = stdout_json(&assert);
    let root = json["tree"][""].as_object().unwrap();
    let mut names: Vec<_> = root.keys().cloned().collect();
    names.sort();
    assert_eq!(names, ["A", "B"]);
    assert_eq!(root["B"]["file"], "src/nested/b.inc");
}

#[test]
fn glob_patterns_fold_in_sorted_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "b.php", "/**\n * @method later\n */\n");
    write(&dir, "a.php", "/**\n * @class First\n */\n");

    let assert = cmd()
        .current_dir(dir.path())
        .arg("*.php")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let json = stdout_json(&assert);
    assert!(json["tree"][""]["First"]["methods"]["later"].is_object());
}

#[test]
fn unmatched_pattern_warns() {
    let dir = TempDir::new().unwrap();

    cmd()
        .current_dir(dir.path())
        .arg("missing/*.php")
        .assert()
        .success()
        .stderr(predicate::str::contains("no files matched: missing/*.php"));
}

#[test]
fn requires_input() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
