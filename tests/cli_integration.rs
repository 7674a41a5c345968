//! CLI integration tests for stash
//!
//! These tests drive the binary over a temporary project: initialization,
//! the shopping list, progress tracking and data checks.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const QUESTS: &str = r#"{"id":"intro","name":"Intro","items":[{"item":"bolts","quantity":2}]}
{"id":"delivery","name":"Delivery","prerequisites":["intro"],"items":[{"item":"gpu","quantity":1,"found_in_raid":true}]}
{"id":"courier","name":"Courier","prerequisites":["delivery"]}
{"id":"finale","name":"Finale","prerequisites":["courier"],"items":[{"item":"ledx","quantity":1,"found_in_raid":true}]}
"#;

const HIDEOUT: &str = r#"{"key":"generator:1","station_name":"Generator","items":[{"item":"bolts","quantity":3}]}
{"key":"generator:2","station_name":"Generator","prerequisites":["generator:1"],"items":[{"item":"gpu","quantity":1}]}
"#;

const ITEMS: &str = r#"{"id":"bolts","name":"Bolts"}
{"id":"gpu","name":"Graphics card","short_name":"GPU"}
"#;

/// Get a command instance for the stash binary, isolated from user config
fn stash_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("stash"));
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".xdg"))
        .env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory and initialize a stash project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    stash_cmd(dir.path())
        .arg("init")
        .arg(dir.path())
        .assert()
        .success();
    dir
}

/// A project with the sample quest, hideout and item catalogs
fn setup_catalog() -> TempDir {
    let dir = setup_project();
    let stash = dir.path().join(".stash");
    fs::write(stash.join("quests.jsonl"), QUESTS).unwrap();
    fs::write(stash.join("hideout.jsonl"), HIDEOUT).unwrap();
    fs::write(stash.join("items.jsonl"), ITEMS).unwrap();
    dir
}

fn needs_json(dir: &Path) -> serde_json::Value {
    let output = stash_cmd(dir)
        .args(["-f", "json", "needs"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

fn find<'a>(items: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    items
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["item"] == id)
        .unwrap_or_else(|| panic!("item {} not in list", id))
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    stash_cmd(dir.path())
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized stash project"));

    assert!(dir.path().join(".stash").is_dir());
    assert!(dir.path().join(".stash/config.toml").is_file());
    assert!(dir.path().join(".stash/quests.jsonl").is_file());
    assert!(dir.path().join(".stash/hideout.jsonl").is_file());
    assert!(dir.path().join(".stash/items.jsonl").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .arg("init")
        .arg(dir.path())
        .assert()
        .success();

    let quests = fs::read_to_string(dir.path().join(".stash/quests.jsonl")).unwrap();
    assert_eq!(quests, QUESTS);
}

#[test]
fn test_commands_outside_project_fail() {
    let dir = TempDir::new().unwrap();

    stash_cmd(dir.path())
        .arg("needs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a stash project"));
}

// =============================================================================
// Shopping List Tests
// =============================================================================

#[test]
fn test_needs_empty_project() {
    let dir = setup_project();

    stash_cmd(dir.path())
        .arg("needs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to collect"));
}

#[test]
fn test_needs_text_table() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .arg("needs")
        .assert()
        .success()
        .stdout(predicate::str::contains("PRIORITY"))
        .stdout(predicate::str::contains("Graphics card"))
        .stdout(predicate::str::contains("NEED_LATER"))
        .stdout(predicate::str::contains("3 items: 1 now, 1 soon, 1 later"));
}

#[test]
fn test_needs_json_aggregates_across_graphs() {
    let dir = setup_catalog();
    let items = needs_json(dir.path());

    let list = items.as_array().unwrap();
    assert_eq!(list.len(), 3);

    // Most urgent first
    assert_eq!(list[0]["item"], "bolts");
    assert_eq!(list[1]["item"], "gpu");
    assert_eq!(list[2]["item"], "ledx");

    let bolts = find(&items, "bolts");
    assert_eq!(bolts["total_quantity"], 5);
    assert_eq!(bolts["priority"], "NEED_NOW");
    assert_eq!(bolts["name"], "Bolts");
    assert_eq!(bolts["sources"].as_array().unwrap().len(), 2);

    let gpu = find(&items, "gpu");
    assert_eq!(gpu["total_quantity"], 2);
    assert_eq!(gpu["found_in_raid"], true);
    assert_eq!(gpu["priority"], "NEED_SOON");

    let ledx = find(&items, "ledx");
    assert_eq!(ledx["priority"], "NEED_LATER");
    assert_eq!(ledx["sources"][0]["depth"], 3);
    assert_eq!(ledx["name"], "ledx");
}

#[test]
fn test_needs_priority_filter() {
    let dir = setup_catalog();

    let output = stash_cmd(dir.path())
        .args(["-f", "json", "needs", "--priority", "later"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = items.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["item"], "ledx");
}

#[test]
fn test_item_shows_sources() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .args(["item", "gpu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Graphics card (gpu)"))
        .stdout(predicate::str::contains("Short name: GPU"))
        .stdout(predicate::str::contains("Delivery [quest delivery]"))
        .stdout(predicate::str::contains("Generator L2 [hideout generator:2]"));
}

#[test]
fn test_item_not_needed_fails() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .args(["item", "salewa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No open requirements"));
}

#[test]
fn test_invalid_lines_warn_and_are_skipped() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".stash/quests.jsonl"),
        r#"{"id":"a","name":"A","items":[{"item":"bolts","quantity":0},{"item":"gpu","quantity":1}]}"#,
    )
    .unwrap();

    stash_cmd(dir.path())
        .arg("needs")
        .assert()
        .success()
        .stdout(predicate::str::contains("gpu"))
        .stdout(predicate::str::contains("bolts").not())
        .stderr(predicate::str::contains("skipped requirement of 'bolts'"));
}

// =============================================================================
// Progress Tests
// =============================================================================

#[test]
fn test_quest_done_promotes_dependents() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .args(["quest", "done", "intro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed quest: Intro (intro)"));

    let progress = fs::read_to_string(dir.path().join(".stash/progress.json")).unwrap();
    assert!(progress.contains("intro"));

    let items = needs_json(dir.path());

    let gpu = find(&items, "gpu");
    assert_eq!(gpu["priority"], "NEED_NOW");

    // Only the hideout still wants bolts
    let bolts = find(&items, "bolts");
    assert_eq!(bolts["total_quantity"], 3);
}

#[test]
fn test_quest_done_twice_is_a_no_op() {
    let dir = setup_catalog();

    let progress_path = dir.path().join(".stash/progress.json");

    stash_cmd(dir.path())
        .args(["quest", "done", "intro"])
        .assert()
        .success();
    let first = fs::read_to_string(&progress_path).unwrap();

    stash_cmd(dir.path())
        .args(["quest", "done", "intro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already completed"));

    // The completion timestamp is not rewritten
    assert_eq!(fs::read_to_string(&progress_path).unwrap(), first);
}

#[test]
fn test_quest_reopen_restores_list() {
    let dir = setup_catalog();
    let before = needs_json(dir.path());

    stash_cmd(dir.path())
        .args(["quest", "done", "intro"])
        .assert()
        .success();
    stash_cmd(dir.path())
        .args(["quest", "reopen", "intro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reopened quest"));

    assert_eq!(needs_json(dir.path()), before);
}

#[test]
fn test_unknown_quest_fails() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .args(["quest", "done", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!dir.path().join(".stash/progress.json").exists());
}

#[test]
fn test_include_completed_keeps_requirements() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .args(["quest", "done", "intro"])
        .assert()
        .success();

    let output = stash_cmd(dir.path())
        .args(["-f", "json", "needs", "--include-completed-quests"])
        .output()
        .unwrap();
    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(find(&items, "bolts")["total_quantity"], 5);
}

#[test]
fn test_station_done_and_show() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .args(["station", "done", "generator:1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed station: Generator L1"));

    let progress = fs::read_to_string(dir.path().join(".stash/progress.json")).unwrap();
    assert!(progress.contains("generator:1"));

    stash_cmd(dir.path())
        .args(["station", "show", "generator:2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Depth: 0 (NEED_NOW)"))
        .stdout(predicate::str::contains("generator:1 (done)"));
}

#[test]
fn test_station_bad_key_fails() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .args(["station", "done", "generator"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid hideout key"));
}

#[test]
fn test_quest_show_json() {
    let dir = setup_catalog();

    let output = stash_cmd(dir.path())
        .args(["-f", "json", "quest", "show", "courier"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let quest: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(quest["depth"], 2);
    assert_eq!(quest["priority"], "NEED_SOON");
    assert_eq!(quest["prerequisites"][0]["id"], "delivery");
    assert_eq!(quest["prerequisites"][0]["state"], "open");
    assert_eq!(quest["unlocks"][0], "finale");
}

// =============================================================================
// Status & Check Tests
// =============================================================================

#[test]
fn test_status_counts() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .args(["quest", "done", "intro"])
        .assert()
        .success();

    let output = stash_cmd(dir.path())
        .args(["-f", "json", "status"])
        .output()
        .unwrap();
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(status["quests"]["total"], 4);
    assert_eq!(status["quests"]["completed"], 1);
    assert_eq!(status["stations"]["total"], 2);
    assert_eq!(status["items"]["need_now"], 2);
}

#[test]
fn test_check_clean_catalog() {
    let dir = setup_catalog();

    stash_cmd(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_check_reports_cycle() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".stash/quests.jsonl"),
        "{\"id\":\"a\",\"name\":\"A\",\"prerequisites\":[\"b\"]}\n{\"id\":\"b\",\"name\":\"B\",\"prerequisites\":[\"a\"]}\n",
    )
    .unwrap();

    stash_cmd(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("prerequisite cycle"))
        .stderr(predicate::str::contains("1 data issue(s) found"));

    // The list still renders despite the cycle
    stash_cmd(dir.path()).arg("needs").assert().success();
}

#[test]
fn test_bad_catalog_records_are_skipped_and_checked() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".stash/quests.jsonl"),
        r#"{"id":"a","name":"A","items":[{"item":"gpu"},{"item":"bolts","quantity":2}]}
{"id":"a","name":"A again"}
not json
"#,
    )
    .unwrap();

    stash_cmd(dir.path())
        .arg("needs")
        .assert()
        .success()
        .stdout(predicate::str::contains("bolts"));

    stash_cmd(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("defined more than once"))
        .stderr(predicate::str::contains("quests.jsonl:3"))
        .stderr(predicate::str::contains("non-positive quantity 0"))
        .stderr(predicate::str::contains("3 data issue(s) found"));
}

#[test]
fn test_global_default_format() {
    let dir = setup_catalog();
    let config_dir = dir.path().join(".xdg/stash-planner");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "default_format = \"json\"\n").unwrap();

    let output = stash_cmd(dir.path()).arg("needs").output().unwrap();
    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(items.is_array());
}
