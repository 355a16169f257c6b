//! End-to-end bridge cycle tests: queries submitted through the library
//! API, executed by the CLI poll loop, and read back from the shared
//! document.

mod common;

use common::harness::{TestEnv, TestNote};
use predicates::prelude::*;
use warren::bridge::{QueryBridge, QueryStatus};

fn indexed_env() -> TestEnv {
    let env = TestEnv::new();
    env.add_note("a.md", &TestNote::new().tag("rust").render());
    env.add_note("b.md", &TestNote::new().tag("rust").link("a").render());
    env.build_index();
    env
}

#[test]
fn test_query_cycle_succeeds_against_index() {
    let env = indexed_env();
    let bridge = QueryBridge::open(env.bridge_path()).unwrap();
    let id = bridge.submit("LIST tags").unwrap();

    env.cmd()
        .bridge_run_once()
        .assert()
        .success()
        .stdout(predicate::str::contains("1 succeeded, 0 failed"));

    let entry = bridge.fetch(&id).unwrap().unwrap();
    assert_eq!(entry.status, QueryStatus::Success);

    let result = entry.result.unwrap();
    assert_eq!(result.kind, "table");
    assert_eq!(result.headers, vec!["tag", "count"]);
    assert_eq!(result.values, vec![serde_json::json!(["rust", 2])]);
}

#[test]
fn test_query_fails_without_index() {
    let env = TestEnv::new();
    let bridge = QueryBridge::open(env.bridge_path()).unwrap();
    let id = bridge.submit("LIST tags").unwrap();

    env.cmd()
        .bridge_run_once()
        .assert()
        .success()
        .stdout(predicate::str::contains("0 succeeded, 1 failed"));

    let entry = bridge.fetch(&id).unwrap().unwrap();
    assert_eq!(entry.status, QueryStatus::Error);
    assert_eq!(entry.error.as_deref(), Some("query engine not available"));
}

#[test]
fn test_unsupported_query_reports_error() {
    let env = indexed_env();
    let bridge = QueryBridge::open(env.bridge_path()).unwrap();
    let id = bridge.submit("TABLE file.name FROM #rust").unwrap();

    env.cmd().bridge_run_once().assert().success();

    let entry = bridge.fetch(&id).unwrap().unwrap();
    assert_eq!(entry.status, QueryStatus::Error);
    assert!(entry.error.unwrap().contains("unsupported query"));
}

#[test]
fn test_availability_probe_updates_status() {
    let env = indexed_env();
    let bridge = QueryBridge::open(env.bridge_path()).unwrap();
    bridge.submit_check().unwrap();

    env.cmd()
        .bridge_run_once()
        .assert()
        .success()
        .stdout(predicate::str::contains("Handled availability probe"));

    let (available, last_checked) = bridge.availability().unwrap();
    assert!(available);
    assert!(last_checked.is_some());

    env.cmd()
        .bridge_status()
        .assert()
        .success()
        .stdout(predicate::str::contains("Engine available: yes"));
}

#[test]
fn test_query_command_sees_result_after_poll() {
    let env = indexed_env();
    let bridge = QueryBridge::open(env.bridge_path()).unwrap();
    let id = bridge.submit("LIST notes").unwrap();

    env.cmd().bridge_run_once().assert().success();

    // The entry is already terminal, so waiting returns immediately.
    let entry = bridge
        .wait(
            &id,
            std::time::Duration::from_secs(1),
            std::time::Duration::from_millis(10),
        )
        .unwrap()
        .unwrap();

    assert_eq!(entry.status, QueryStatus::Success);
    let result = entry.result.unwrap();
    assert_eq!(result.kind, "list");
    assert_eq!(
        result.values,
        vec![serde_json::json!("a.md"), serde_json::json!("b.md")]
    );
}

#[test]
fn test_clear_removes_completed_entries() {
    let env = indexed_env();
    let bridge = QueryBridge::open(env.bridge_path()).unwrap();
    bridge.submit("LIST tags").unwrap();
    bridge.submit("LIST notes").unwrap();

    env.cmd().bridge_run_once().assert().success();

    env.cmd()
        .bridge_clear()
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 queries"));

    assert!(bridge.entries().unwrap().is_empty());
}
