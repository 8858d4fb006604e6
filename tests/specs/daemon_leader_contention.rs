//! Leader contention across two hosts mounting the same (tempdir-simulated)
//! NFS-shared state directory — scenario 5 of the spec's end-to-end list.

use crate::prelude::*;

#[test]
fn second_host_exits_nonzero_while_the_first_holds_the_lease() {
    let host_a = Harness::with_hostname("host-a");
    host_a.kicker().args(&["run"]).passes();

    let started = wait_for(SPEC_WAIT_MAX_MS, || host_a.daemon_is_running());
    assert!(started, "host-a should acquire the lease");

    let leader_before = host_a.leader_json().expect("leader metadata should exist");
    assert_eq!(leader_before["hostname"], "host-a");

    let host_b = host_a.shared_host("host-b");
    host_b.kickerd().args(&["--lease-seconds", "60"]).fails();

    // host-b's failed attempt must not have clobbered host-a's claim.
    let leader_after = host_a.leader_json().expect("leader metadata should still exist");
    assert_eq!(leader_after["hostname"], "host-a");
}

#[test]
fn second_host_with_quiet_exits_zero_without_side_effects() {
    let host_a = Harness::with_hostname("host-a");
    host_a.kicker().args(&["run"]).passes();
    let started = wait_for(SPEC_WAIT_MAX_MS, || host_a.daemon_is_running());
    assert!(started);

    let host_b = host_a.shared_host("host-b");
    host_b.kickerd().args(&["--lease-seconds", "60", "--quiet"]).passes();

    let leader = host_a.leader_json().expect("leader metadata should still name host-a");
    assert_eq!(leader["hostname"], "host-a");
}

#[test]
fn host_b_acquires_after_host_a_releases() {
    let host_a = Harness::with_hostname("host-a");
    host_a.kicker().args(&["run"]).passes();
    let started = wait_for(SPEC_WAIT_MAX_MS, || host_a.daemon_is_running());
    assert!(started);

    host_a.kicker().args(&["stop"]).passes();
    let stopped = wait_for(SPEC_WAIT_MAX_MS, || !host_a.daemon_is_running());
    assert!(stopped);
    assert!(host_a.leader_json().is_none());

    let host_b = host_a.shared_host("host-b");
    host_b.kicker().args(&["run"]).passes();
    let acquired = wait_for(SPEC_WAIT_MAX_MS, || {
        host_a.leader_json().map(|m| m["hostname"] == "host-b").unwrap_or(false)
    });
    assert!(acquired, "host-b should acquire the now-free lease");

    host_b.kicker().args(&["stop"]).passes();
}
