// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule Scheduler (C8): a min-heap of `next_due_at` times, one slot per
//! rule, computed only from that rule's own `poll_interval` and its own
//! pass completion time. No global tick aligns rules — each one drifts
//! independently, exactly as if it ran in its own polling loop.

use crate::pass::{PassContext, PassOutcome, PassResult};
use kicker_core::rate_limit::try_fire;
use kicker_core::rule::RuleId;
use kicker_core::{Rule, RuleRuntimeState, RuleSet};
use kicker_storage::log_writer::{LogRecord, Phase};
use kicker_storage::RuleStats;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Upper bound on how long the event loop ever sleeps between checking
/// whether anything is due — keeps lease refresh and signal handling
/// responsive even with a sparse rule set.
pub const TICK_CEILING: Duration = Duration::from_secs(1);

/// Owns the live rule set and its per-rule runtime state, and knows how to
/// run one pass for a due rule.
pub struct Scheduler {
    default_poll_interval_secs: f64,
    rules: RuleSet,
    runtime: HashMap<RuleId, RuleRuntimeState>,
}

impl Scheduler {
    /// Build a scheduler from a freshly loaded rule set. Every rule starts
    /// due immediately (`next_due_at = now`); the first pass over several
    /// rules runs them in id order (ties in `next_due_at` break on id).
    pub fn new(rules: RuleSet, now: Instant) -> Self {
        let default_poll_interval_secs = rules.default_poll_interval;
        let mut runtime = HashMap::with_capacity(rules.rules.len());
        for rule in &rules.rules {
            runtime.insert(rule.id, RuleRuntimeState::new(now));
        }
        Self {
            default_poll_interval_secs,
            rules,
            runtime,
        }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    pub fn runtime_state(&self, id: RuleId) -> Option<&RuleRuntimeState> {
        self.runtime.get(&id)
    }

    /// Snapshot every live rule's counters for the stats sidecar. Takes
    /// `wall_now` to evict expired entries from the 24h sliding window
    /// before reporting its length, the same way a pass does.
    pub fn stats_snapshot(&mut self, wall_now: chrono::DateTime<chrono::Utc>) -> HashMap<RuleId, RuleStats> {
        self.runtime
            .iter_mut()
            .map(|(id, state)| {
                let actions_last_24h = state.actions_last_24h(wall_now);
                (
                    *id,
                    RuleStats {
                        checks: state.totals.checks,
                        actions: state.totals.actions,
                        actions_last_24h,
                    },
                )
            })
            .collect()
    }

    /// The instant the event loop should next wake up for rule work,
    /// bounded by [`TICK_CEILING`] so callers also get a chance to check
    /// lease refresh and reload timers even with no rules due.
    pub fn next_wakeup(&self, now: Instant) -> Instant {
        let earliest_due = self.runtime.values().map(|r| r.next_due_at).min();
        let ceiling = now + TICK_CEILING;
        match earliest_due {
            Some(due) if due < ceiling => due,
            _ => ceiling,
        }
    }

    /// Rule ids due at or before `now`, ordered by `next_due_at` then id
    /// ascending — the order the spec requires passes to be processed in.
    pub fn due_rule_ids(&self, now: Instant) -> Vec<RuleId> {
        let mut due: Vec<(Instant, RuleId)> = self
            .runtime
            .iter()
            .filter(|(_, state)| state.next_due_at <= now)
            .map(|(id, state)| (state.next_due_at, *id))
            .collect();
        due.sort_by_key(|(at, id)| (*at, *id));
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Merge a freshly loaded rule set into the running scheduler: rules
    /// whose id survives keep their runtime state (and hence their
    /// `prev`/`curr` history and rate-limit window); new ids start fresh
    /// and due immediately; removed ids drop their runtime state.
    pub fn reload(&mut self, new_rules: RuleSet, now: Instant) {
        self.default_poll_interval_secs = new_rules.default_poll_interval;
        self.runtime.retain(|id, _| new_rules.find(*id).is_some());
        for rule in &new_rules.rules {
            self.runtime.entry(rule.id).or_insert_with(|| RuleRuntimeState::new(now));
        }
        self.rules = new_rules;
    }

    /// Drop a rule and its runtime state from the in-memory scheduler
    /// (used after a `once` rule fires and the caller has persisted its
    /// removal to the rule store).
    pub fn remove_rule(&mut self, id: RuleId) {
        self.rules.remove(id);
        self.runtime.remove(&id);
    }

    /// Run one full pass for `id`: check, trigger evaluation, rate limit,
    /// and (if permitted) action — logging each script invocation and
    /// rescheduling the rule's next due time. Returns `None` if the rule
    /// no longer exists (e.g. removed by a concurrent reload).
    pub async fn run_pass(&mut self, id: RuleId, ctx: &PassContext<'_>) -> Option<PassResult> {
        let rule = self.rules.find(id)?.clone();
        let t0 = ctx.clock.monotonic_now();

        let timeout = rule.effective_timeout(self.default_poll_interval_secs);
        let check_outcome = ctx.runner.run(&rule.check_script, timeout, ctx.home_dir).await;

        let check_record = LogRecord {
            // Log timestamps are rendered in the local offset (spec §4.6),
            // not the UTC the runner/clock use internally for duration and
            // rate-limit-window arithmetic.
            timestamp: check_outcome.started_at.with_timezone(&chrono::Local),
            rule_id: id,
            script_name: basename(&rule.check_script),
            phase: Phase::Check,
            exit_code: check_outcome.exit_code,
            duration_ms: check_outcome.duration_ms,
            stdout: check_outcome.stdout,
            stderr: check_outcome.stderr,
            timed_out: check_outcome.timed_out,
        };
        let _ = ctx.checks_log.append(&check_record);

        let state = self.runtime.entry(id).or_insert_with(|| RuleRuntimeState::new(t0));
        let prev = state.curr_exit_code;
        state.prev_exit_code = prev;
        state.curr_exit_code = Some(check_outcome.exit_code);
        state.totals.checks += 1;

        let fired = kicker_core::evaluate_trigger(prev, check_outcome.exit_code, rule.trigger);

        let mut result = PassResult {
            check_exit_code: check_outcome.exit_code,
            check_timed_out: check_outcome.timed_out,
            outcome: PassOutcome::NoFire,
            action_exit_code: None,
            remove_rule: false,
        };

        if fired {
            let wall_now = ctx.clock.wall_now();
            let limit = rule.effective_rate_limit(self.default_poll_interval_secs);
            let permitted = try_fire(&mut state.recent_fires, limit, wall_now);

            if permitted {
                let action_timeout = rule.effective_timeout(self.default_poll_interval_secs);
                let action_outcome = ctx.runner.run(&rule.action_script, action_timeout, ctx.home_dir).await;

                let action_record = LogRecord {
                    timestamp: action_outcome.started_at.with_timezone(&chrono::Local),
                    rule_id: id,
                    script_name: basename(&rule.action_script),
                    phase: Phase::Action,
                    exit_code: action_outcome.exit_code,
                    duration_ms: action_outcome.duration_ms,
                    stdout: action_outcome.stdout,
                    stderr: action_outcome.stderr,
                    timed_out: action_outcome.timed_out,
                };
                let _ = ctx.actions_log.append(&action_record);

                state.record_action_dispatch(wall_now);
                result.outcome = PassOutcome::Fired;
                result.action_exit_code = Some(action_outcome.exit_code);
                result.remove_rule = rule.once;
            } else {
                tracing::info!(rule_id = %id, "action throttled by rate limit");
                result.outcome = PassOutcome::Throttled;
            }
        }

        let now = ctx.clock.monotonic_now();
        let poll_interval = rule.poll_interval(self.default_poll_interval_secs);
        let candidate = t0 + poll_interval;
        state.next_due_at = if candidate > now { candidate } else { now };

        Some(result)
    }
}

fn basename(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
