//! `kicker stats` against the daemon-written sidecar. These specs write the
//! sidecar directly rather than running the daemon — the wire format is the
//! contract under test, not the scheduler (covered by `kicker-engine`'s own
//! tests).

use crate::prelude::*;

fn write_stats(h: &Harness, json: &str) {
    std::fs::write(h.state_dir().join("kicker_stats.json"), json).unwrap();
}

#[test]
fn stats_with_no_sidecar_reports_zero_counters() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");
    h.kicker().args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero"]).passes();

    h.kicker()
        .args(&["stats"])
        .passes()
        .stdout_has("checks=0")
        .stdout_has("actions=0")
        .stdout_has("actions_last_24h=0");
}

#[test]
fn stats_reflects_the_sidecar_snapshot() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");
    h.kicker().args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero"]).passes();
    write_stats(&h, r#"{"1": {"checks": 42, "actions": 7, "actions_last_24h": 3}}"#);

    h.kicker()
        .args(&["stats", "1"])
        .passes()
        .stdout_has("checks=42")
        .stdout_has("actions=7")
        .stdout_has("actions_last_24h=3");
}

#[test]
fn stats_for_an_unknown_id_fails() {
    let h = Harness::new();
    h.kicker().args(&["stats", "5"]).fails().stderr_has("no rule with id 5");
}

#[test]
fn stats_json_output_is_an_array_of_rows() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");
    h.kicker().args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero"]).passes();
    write_stats(&h, r#"{"1": {"checks": 2, "actions": 1, "actions_last_24h": 1}}"#);

    let output = h.kicker().args(&["stats", "-o", "json"]).passes().stdout();
    let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["checks"], 2);
}
