// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample_rule(id: u64, trigger: TriggerMode) -> Rule {
    Rule {
        id: RuleId::new(id),
        check_script: "/home/user/check.sh".into(),
        action_script: "/home/user/act.sh".into(),
        trigger,
        poll_interval_secs: None,
        rate_limit: None,
        timeout_secs: None,
        once: false,
        original_spec: trigger.describe(),
    }
}

#[test]
fn rate_limit_parses_n_over_seconds() {
    assert_eq!(RateLimit::parse("2/5").unwrap(), RateLimit::new(2, 5));
}

#[yare::parameterized(
    missing_slash = { "25" },
    non_numeric_count = { "a/5" },
    non_numeric_window = { "2/b" },
    empty = { "" },
)]
fn rate_limit_rejects_malformed_spec(spec: &str) {
    assert!(RateLimit::parse(spec).is_err());
}

#[test]
fn allocate_id_is_monotonic_and_never_reuses_a_removed_id() {
    let mut set = RuleSet::new(60.0);

    let first = set.allocate_id();
    assert_eq!(first, RuleId::new(1));
    set.rules.push(sample_rule(first.0, TriggerMode::OnZero));

    let second = set.allocate_id();
    assert_eq!(second, RuleId::new(2));
    set.rules.push(sample_rule(second.0, TriggerMode::OnZero));

    set.remove(second);

    // Even though id 2 (the current maximum) was just removed, the next
    // allocation must not reuse it.
    let third = set.allocate_id();
    assert_eq!(third, RuleId::new(3));
}

#[test]
fn repair_next_id_raises_the_counter_past_the_highest_existing_id() {
    let mut set = RuleSet::new(60.0);
    set.rules.push(sample_rule(5, TriggerMode::OnZero));
    set.next_id = 1; // simulates a store loaded before `next_id` was persisted

    set.repair_next_id();

    assert_eq!(set.allocate_id(), RuleId::new(6));
}

#[test]
fn effective_rate_limit_defaults_to_one_per_poll_interval() {
    let mut rule = sample_rule(1, TriggerMode::OnNonzero);
    rule.poll_interval_secs = Some(30.0);
    assert_eq!(rule.effective_rate_limit(60.0), RateLimit::new(1, 30));
}

#[test]
fn effective_timeout_defaults_to_ninety_percent_of_poll_interval() {
    let rule = sample_rule(1, TriggerMode::OnZero);
    assert_eq!(
        rule.effective_timeout(60.0),
        std::time::Duration::from_secs_f64(54.0)
    );
}

#[test]
fn trigger_mode_round_trips_through_yaml() {
    for mode in [
        TriggerMode::OnZero,
        TriggerMode::OnNonzero,
        TriggerMode::OnTransitionFailToPass,
        TriggerMode::OnTransitionPassToFail,
        TriggerMode::OnCodeN(7),
    ] {
        let rule = sample_rule(1, mode);
        let yaml = serde_yaml_for_test(&rule);
        let back: Rule = serde_json::from_value(serde_json::to_value(&rule).unwrap()).unwrap();
        assert_eq!(back.trigger, mode, "round trip via json for {yaml}");
    }
}

fn serde_yaml_for_test(rule: &Rule) -> String {
    serde_json::to_string(rule).unwrap()
}

#[test]
fn only_transition_modes_are_transition() {
    assert!(!TriggerMode::OnZero.is_transition());
    assert!(!TriggerMode::OnNonzero.is_transition());
    assert!(!TriggerMode::OnCodeN(0).is_transition());
    assert!(TriggerMode::OnTransitionFailToPass.is_transition());
    assert!(TriggerMode::OnTransitionPassToFail.is_transition());
}

#[test]
fn actions_last_24h_drops_entries_older_than_window() {
    let now = Utc::now();
    let mut state = RuleRuntimeState::new(Instant::now());
    state.recent_actions_24h.push_back(now - chrono::Duration::hours(25));
    state.recent_actions_24h.push_back(now - chrono::Duration::hours(1));

    assert_eq!(state.actions_last_24h(now), 1);
}
