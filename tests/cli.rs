use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn store_json(clocks: &str, reference: Option<&str>) -> String {
    let mut entries = serde_json::Map::new();
    entries.insert("clocks".to_string(), clocks.into());
    if let Some(reference) = reference {
        entries.insert("ref".to_string(), reference.into());
    }
    serde_json::Value::Object(entries).to_string()
}

#[test]
fn list_on_fresh_store_initialises_utc() {
    let dir = tempdir().expect("tempdir");
    let store = dir.path().join("store.json");

    let mut cmd = cargo_bin_cmd!("worldclocks");
    cmd.arg("--list")
        .arg("--store")
        .arg(&store)
        .arg("--at")
        .arg("2024-01-01T00:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference clock: UTC"))
        .stdout(predicate::str::contains("00:00  2024-01-01"));

    let written = fs::read_to_string(&store).expect("store written");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(parsed["clocks"], r#"{"UTC":"UTC"}"#);
    assert_eq!(parsed["ref"], "UTC");
}

#[test]
fn list_sorts_by_offset_and_captions_days() {
    let dir = tempdir().expect("tempdir");
    let store = dir.path().join("store.json");
    fs::write(
        &store,
        store_json(r#"{"A":"+02:00","B":"-05:00","UTC":"UTC"}"#, Some("UTC")),
    )
    .expect("write store");

    let output = cargo_bin_cmd!("worldclocks")
        .arg("--list")
        .arg("--store")
        .arg(&store)
        .arg("--at")
        .arg("2024-01-01T00:00:00Z")
        .output()
        .expect("run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let clock_lines = stdout
        .lines()
        .filter(|line| line.starts_with('['))
        .collect::<Vec<_>>();
    assert_eq!(clock_lines.len(), 3);
    assert!(clock_lines[0].contains("B") && clock_lines[0].contains("UTC-05:00  19:00  Yesterday"));
    assert!(clock_lines[1].starts_with("[x] UTC"));
    assert!(clock_lines[2].contains("UTC+02:00  02:00  Today"));
}

#[test]
fn stale_reference_is_repaired_on_disk() {
    let dir = tempdir().expect("tempdir");
    let store = dir.path().join("store.json");
    fs::write(&store, store_json(r#"{"Tokyo":"Asia/Tokyo"}"#, Some("Atlantis"))).expect("write");

    cargo_bin_cmd!("worldclocks")
        .arg("--list")
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference clock: UTC"));

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&store).expect("read")).expect("json");
    assert_eq!(parsed["ref"], "UTC");
}

#[test]
fn invalid_instant_prints_placeholders() {
    let dir = tempdir().expect("tempdir");
    let store = dir.path().join("store.json");
    fs::write(&store, store_json(r#"{"Tokyo":"+09:00"}"#, None)).expect("write");

    cargo_bin_cmd!("worldclocks")
        .arg("--list")
        .arg("--store")
        .arg(&store)
        .arg("--at")
        .arg("not-a-time")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reference instant: invalid"))
        .stdout(predicate::str::contains("??:??  ????-??-??"))
        .stdout(predicate::str::contains("???        ??:??  ?"));
}

#[test]
fn malformed_store_fails_with_clear_error() {
    let dir = tempdir().expect("tempdir");
    let store = dir.path().join("store.json");
    fs::write(&store, "{ not-valid-json ").expect("write invalid json");

    cargo_bin_cmd!("worldclocks")
        .arg("--list")
        .arg("--store")
        .arg(&store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid store JSON"));
}

#[test]
fn zero_tick_is_rejected() {
    cargo_bin_cmd!("worldclocks")
        .arg("--tick-ms")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tick-ms must be greater than zero"));
}
