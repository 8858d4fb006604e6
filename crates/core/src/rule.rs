// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule data model: the unit of automation, and its per-lifetime runtime
//! state.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;

/// Stable integer identifier for a [`Rule`]. Assigned by the rule store on
/// creation; never reused, even after the rule it named is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u64);

impl RuleId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The predicate over (previous, current) check exit codes that decides
/// whether an action fires for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    OnZero,
    OnNonzero,
    OnTransitionFailToPass,
    OnTransitionPassToFail,
    OnCodeN(i32),
}

impl TriggerMode {
    /// True for the two transition modes, which must never fire on a
    /// rule's first evaluation.
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            TriggerMode::OnTransitionFailToPass | TriggerMode::OnTransitionPassToFail
        )
    }

    /// Human-readable reconstruction of the trigger, used for `kicker list`
    /// and as the default `original_spec` when a rule is created without one.
    pub fn describe(&self) -> String {
        match self {
            TriggerMode::OnZero => "--if-zero".to_string(),
            TriggerMode::OnNonzero => "--if-nonzero".to_string(),
            TriggerMode::OnTransitionFailToPass => "--if-fail-to-pass".to_string(),
            TriggerMode::OnTransitionPassToFail => "--if-pass-to-fail".to_string(),
            TriggerMode::OnCodeN(n) => format!("--if-code {n}"),
        }
    }
}

/// Wire representation of [`TriggerMode`] matching the store format's
/// `trigger: { mode, n? }` mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TriggerSpec {
    mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<i32>,
}

impl Serialize for TriggerMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let spec = match self {
            TriggerMode::OnZero => TriggerSpec {
                mode: "on_zero".to_string(),
                n: None,
            },
            TriggerMode::OnNonzero => TriggerSpec {
                mode: "on_nonzero".to_string(),
                n: None,
            },
            TriggerMode::OnTransitionFailToPass => TriggerSpec {
                mode: "on_transition_fail_to_pass".to_string(),
                n: None,
            },
            TriggerMode::OnTransitionPassToFail => TriggerSpec {
                mode: "on_transition_pass_to_fail".to_string(),
                n: None,
            },
            TriggerMode::OnCodeN(n) => TriggerSpec {
                mode: "on_code_n".to_string(),
                n: Some(*n),
            },
        };
        spec.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TriggerMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let spec = TriggerSpec::deserialize(deserializer)?;
        TriggerMode::try_from(spec).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<TriggerSpec> for TriggerMode {
    type Error = CoreError;

    fn try_from(spec: TriggerSpec) -> Result<Self, Self::Error> {
        match spec.mode.as_str() {
            "on_zero" => Ok(TriggerMode::OnZero),
            "on_nonzero" => Ok(TriggerMode::OnNonzero),
            "on_transition_fail_to_pass" => Ok(TriggerMode::OnTransitionFailToPass),
            "on_transition_pass_to_fail" => Ok(TriggerMode::OnTransitionPassToFail),
            "on_code_n" => {
                let n = spec
                    .n
                    .ok_or_else(|| CoreError::InvalidTriggerMode("on_code_n missing n".into()))?;
                Ok(TriggerMode::OnCodeN(n))
            }
            other => Err(CoreError::InvalidTriggerMode(other.to_string())),
        }
    }
}

/// A rate limit of `count` actions per rolling `window` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub count: u32,
    pub window_secs: u64,
}

impl RateLimit {
    pub fn new(count: u32, window_secs: u64) -> Self {
        Self { count, window_secs }
    }

    /// Parse the `N/seconds` unit used on the CLI (e.g. `"2/5"`).
    pub fn parse(spec: &str) -> Result<Self, CoreError> {
        let (count_str, window_str) = spec
            .split_once('/')
            .ok_or_else(|| CoreError::InvalidRateLimit(spec.to_string()))?;
        let count: u32 = count_str
            .parse()
            .map_err(|_| CoreError::InvalidRateLimit(spec.to_string()))?;
        let window_secs: u64 = window_str
            .parse()
            .map_err(|_| CoreError::InvalidRateLimit(spec.to_string()))?;
        Ok(RateLimit::new(count, window_secs))
    }
}

/// The unit of automation: a check script, an action script, and the
/// trigger/scheduling parameters governing when the action fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub check_script: std::path::PathBuf,
    pub action_script: std::path::PathBuf,
    pub trigger: TriggerMode,
    /// Positive seconds; `None` inherits the global default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
    /// Seconds for both check and action; `None` defaults to
    /// `poll_interval * 0.9`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<f64>,
    #[serde(default)]
    pub once: bool,
    pub original_spec: String,
}

impl Rule {
    /// Resolve the effective poll interval, given the daemon's global
    /// default.
    pub fn poll_interval(&self, default_poll_interval_secs: f64) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.poll_interval_secs.unwrap_or(default_poll_interval_secs))
    }

    /// Resolve the effective rate limit: explicit, or `(1, poll_interval)`.
    pub fn effective_rate_limit(&self, default_poll_interval_secs: f64) -> RateLimit {
        self.rate_limit.unwrap_or_else(|| {
            let interval = self.poll_interval(default_poll_interval_secs);
            // `window_secs` is a whole-second `u64`; round rather than
            // truncate so a sub-second poll interval (e.g. 0.6s) still
            // gets a 1s window instead of silently flooring to 0.
            RateLimit::new(1, interval.as_secs_f64().round().max(1.0) as u64)
        })
    }

    /// Resolve the effective timeout: explicit, or `poll_interval * 0.9`.
    pub fn effective_timeout(&self, default_poll_interval_secs: f64) -> std::time::Duration {
        match self.timeout_secs {
            Some(t) => std::time::Duration::from_secs_f64(t),
            None => self.poll_interval(default_poll_interval_secs).mul_f64(0.9),
        }
    }
}

/// Running totals tracked per rule for `kicker stats`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RuleTotals {
    pub checks: u64,
    pub actions: u64,
}

/// Mutable, per-rule, per-daemon-lifetime state. Not persisted across
/// restarts (rebuilt from the first observation of each rule), except for
/// `totals`, which the daemon writes back into the store so `kicker stats`
/// can read it out-of-process.
#[derive(Debug, Clone)]
pub struct RuleRuntimeState {
    pub prev_exit_code: Option<i32>,
    pub curr_exit_code: Option<i32>,
    pub next_due_at: Instant,
    /// Wall-clock timestamps of fires within the current rate window,
    /// oldest first.
    pub recent_fires: VecDeque<DateTime<Utc>>,
    /// Wall-clock timestamps of action dispatches within the last 24h,
    /// oldest first (sliding window, not calendar day; see DESIGN.md).
    pub recent_actions_24h: VecDeque<DateTime<Utc>>,
    pub totals: RuleTotals,
}

impl RuleRuntimeState {
    /// Fresh runtime state for a rule observed for the first time, due
    /// immediately.
    pub fn new(now: Instant) -> Self {
        Self {
            prev_exit_code: None,
            curr_exit_code: None,
            next_due_at: now,
            recent_fires: VecDeque::new(),
            recent_actions_24h: VecDeque::new(),
            totals: RuleTotals::default(),
        }
    }

    /// Drop fire timestamps older than the 24h sliding window and return the
    /// count remaining.
    pub fn actions_last_24h(&mut self, wall_now: DateTime<Utc>) -> u64 {
        let cutoff = wall_now - chrono::Duration::hours(24);
        while matches!(self.recent_actions_24h.front(), Some(t) if *t < cutoff) {
            self.recent_actions_24h.pop_front();
        }
        self.recent_actions_24h.len() as u64
    }

    pub fn record_action_dispatch(&mut self, wall_now: DateTime<Utc>) {
        self.totals.actions += 1;
        self.recent_actions_24h.push_back(wall_now);
    }
}

/// The persisted collection of rules plus store-wide defaults, matching the
/// `version`/`default_poll_interval`/`rules` mapping of the store format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub version: u32,
    pub default_poll_interval: f64,
    /// The id the next `allocate_id` call will hand out. Persisted so a
    /// removed rule's id is never reused across a daemon/CLI restart —
    /// unlike `rules.iter().max()`, this counter only ever increments.
    #[serde(default = "default_next_id")]
    pub next_id: u64,
    pub rules: Vec<Rule>,
}

fn default_next_id() -> u64 {
    1
}

impl RuleSet {
    pub fn new(default_poll_interval: f64) -> Self {
        Self {
            version: 1,
            default_poll_interval,
            next_id: 1,
            rules: Vec::new(),
        }
    }

    /// Hand out the next unused rule id and advance the counter. Never
    /// reuses an id, even if the rule that held it has since been removed.
    pub fn allocate_id(&mut self) -> RuleId {
        let id = RuleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Raise `next_id` to at least one past the current maximum rule id.
    /// Repairs a store loaded from before `next_id` was persisted (or one
    /// edited by hand) so it can never hand out an id that collides with
    /// an existing rule.
    pub fn repair_next_id(&mut self) {
        let floor = self.rules.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        self.next_id = self.next_id.max(floor);
    }

    pub fn find(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn remove(&mut self, id: RuleId) -> Option<Rule> {
        let pos = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(pos))
    }
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
