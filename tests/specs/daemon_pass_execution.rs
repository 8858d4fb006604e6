//! A live `kickerd` running a real rule against real scripts: the
//! scheduling, trigger, and log-writer unit tests already cover the
//! properties in isolation (via a fake clock and a fake script runner);
//! this spec checks the wiring end to end through the actual binaries.

use crate::prelude::*;

#[test]
fn a_fast_polling_rule_fires_and_logs_both_phases() {
    let h = Harness::new();

    let marker = h.state_dir().join("fired");
    let check = h.script("check.sh", "exit 0");
    let action = h.script("action.sh", &format!("touch {}", marker.display()));

    h.kicker()
        .args(&[
            "add",
            check.to_str().unwrap(),
            action.to_str().unwrap(),
            "--if-zero",
            "--every",
            "0.1",
            "--timeout",
            "2",
        ])
        .passes();

    h.kicker().args(&["run"]).passes();
    let started = wait_for(SPEC_WAIT_MAX_MS, || h.daemon_is_running());
    assert!(started, "daemon should be running");

    let fired = wait_for(SPEC_WAIT_MAX_MS, || marker.exists());
    assert!(fired, "action script should have run at least once");

    let checks_log_has_entries = wait_for(SPEC_WAIT_MAX_MS, || {
        std::fs::read_to_string(h.state_dir().join("kicker_checks.log"))
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    });
    assert!(checks_log_has_entries, "checks log should have at least one record");

    let checks_log = std::fs::read_to_string(h.state_dir().join("kicker_checks.log")).unwrap();
    assert!(checks_log.contains("phase=Check") || checks_log.contains("\"phase\":\"check\""));

    let actions_log = std::fs::read_to_string(h.state_dir().join("kicker_actions.log")).unwrap();
    assert!(actions_log.contains("phase=Action") || actions_log.contains("\"phase\":\"action\""));

    h.kicker().args(&["stop"]).passes();
}

#[test]
fn a_once_rule_is_removed_from_the_store_after_it_fires() {
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
            "0.1",
            "--timeout",
            "2",
            "--once",
        ])
        .passes();

    h.kicker().args(&["run"]).passes();
    let started = wait_for(SPEC_WAIT_MAX_MS, || h.daemon_is_running());
    assert!(started);

    let removed = wait_for(SPEC_WAIT_MAX_MS, || {
        h.kicker().args(&["list"]).passes().stdout().contains("no rules")
    });
    assert!(removed, "a `once` rule should be removed from the store after firing");

    h.kicker().args(&["stop"]).passes();
}

#[test]
fn stats_reflect_checks_and_actions_after_a_live_pass() {
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
            "0.1",
            "--timeout",
            "2",
        ])
        .passes();

    h.kicker().args(&["run"]).passes();
    let started = wait_for(SPEC_WAIT_MAX_MS, || h.daemon_is_running());
    assert!(started);

    let has_checks = wait_for(SPEC_WAIT_MAX_MS, || {
        !h.kicker().args(&["stats"]).passes().stdout().contains("checks=0")
    });
    assert!(has_checks, "stats should report at least one check after the daemon has run a pass");

    h.kicker().args(&["stop"]).passes();
}
