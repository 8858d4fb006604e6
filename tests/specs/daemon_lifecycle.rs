//! `kicker run`/`kicker stop` against a real `kickerd` process.

use crate::prelude::*;

#[test]
fn run_then_stop_clears_the_leader_lease() {
    let h = Harness::new();

    h.kicker().args(&["run"]).passes().stdout_has("started kickerd");

    let started = wait_for(SPEC_WAIT_MAX_MS, || h.daemon_is_running());
    assert!(started, "daemon should acquire the leader lease shortly after starting");

    h.kicker().args(&["stop"]).passes().stdout_has("stopped daemon");

    let stopped = wait_for(SPEC_WAIT_MAX_MS, || !h.daemon_is_running());
    assert!(stopped, "leader lease should be released after stop");
}

#[test]
fn stop_with_no_daemon_running_fails_unless_quiet() {
    let h = Harness::new();

    h.kicker().args(&["stop"]).fails().stderr_has("no daemon is running");
    h.kicker().args(&["stop", "--quiet"]).passes();
}

#[test]
fn stop_is_idempotent_after_the_daemon_already_exited() {
    let h = Harness::new();

    h.kicker().args(&["run"]).passes();
    let started = wait_for(SPEC_WAIT_MAX_MS, || h.daemon_is_running());
    assert!(started);

    h.kicker().args(&["stop"]).passes();
    let stopped = wait_for(SPEC_WAIT_MAX_MS, || !h.daemon_is_running());
    assert!(stopped);

    // A second stop against an already-clean state directory is a
    // "no daemon running" condition, not an error worth hiding by default.
    h.kicker().args(&["stop"]).fails().stderr_has("no daemon is running");
}
