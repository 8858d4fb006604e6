//! `kicker add`/`list`/`remove` against the on-disk rule store.

use crate::prelude::*;

#[test]
fn list_on_a_fresh_store_reports_no_rules() {
    let h = Harness::new();
    h.kicker().args(&["list"]).passes().stdout_has("no rules");
}

#[test]
fn add_then_list_shows_the_new_rule() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");

    h.kicker()
        .args(&[
            "add",
            check.to_str().unwrap(),
            action.to_str().unwrap(),
            "--if-zero",
            "--every",
            "30",
        ])
        .passes()
        .stdout_has("added rule 1");

    h.kicker().args(&["list"]).passes().stdout_has("--if-zero").stdout_has("30s");
}

#[test]
fn add_assigns_monotonically_increasing_ids_that_are_not_reused() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");

    for _ in 0..3 {
        h.kicker()
            .args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero"])
            .passes();
    }
    h.kicker().args(&["remove", "2"]).passes();

    let output = h.kicker().args(&["list", "-o", "json"]).passes().stdout();
    let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
    let ids: Vec<i64> = rows.as_array().unwrap().iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 3]);

    // A fourth add must not reuse id 2.
    h.kicker()
        .args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero"])
        .passes()
        .stdout_has("added rule 4");
}

#[test]
fn removing_the_current_highest_id_does_not_let_the_next_add_reuse_it() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");

    for _ in 0..3 {
        h.kicker()
            .args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero"])
            .passes();
    }
    // Remove rule 3: the current maximum, not a middle id. A `next_id`
    // derived from `rules.iter().max()` would hand 3 right back out here.
    h.kicker().args(&["remove", "3"]).passes();

    h.kicker()
        .args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero"])
        .passes()
        .stdout_has("added rule 4");
}

#[test]
fn add_without_a_trigger_flag_fails() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");

    h.kicker()
        .args(&["add", check.to_str().unwrap(), action.to_str().unwrap()])
        .fails()
        .stderr_has("trigger flag");
}

#[test]
fn add_with_two_trigger_flags_fails() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");

    h.kicker()
        .args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero", "--if-nonzero"])
        .fails();
}

#[test]
fn add_with_an_invalid_rate_fails() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");

    h.kicker()
        .args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero", "--rate", "nonsense"])
        .fails()
        .stderr_has("invalid --rate");
}

#[test]
fn remove_an_unknown_id_fails() {
    let h = Harness::new();
    h.kicker().args(&["remove", "99"]).fails().stderr_has("no rule with id 99");
}

#[test]
fn remove_then_list_no_longer_shows_the_rule() {
    let h = Harness::new();
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", "exit 0");

    h.kicker().args(&["add", check.to_str().unwrap(), action.to_str().unwrap(), "--if-zero"]).passes();
    h.kicker().args(&["remove", "1"]).passes().stdout_has("removed rule 1");
    h.kicker().args(&["list"]).passes().stdout_has("no rules");
}
