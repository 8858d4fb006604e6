// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One pass: check → state update → trigger decision → (optionally) rate
//! limit → action → reschedule. See [`crate::Scheduler::run_pass`].

use kicker_adapters::ScriptRunner;
use kicker_core::Clock;
use kicker_storage::LogWriter;
use std::path::Path;

/// Shared dependencies for executing a pass; borrowed for the duration of
/// a single `run_pass` call.
pub struct PassContext<'a> {
    pub runner: &'a dyn ScriptRunner,
    pub checks_log: &'a LogWriter,
    pub actions_log: &'a LogWriter,
    pub clock: &'a dyn Clock,
    pub home_dir: &'a Path,
}

/// What happened to the fire candidate of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The trigger did not fire for this pass.
    NoFire,
    /// The trigger fired but the rate limiter denied it.
    Throttled,
    /// The trigger fired and the action ran.
    Fired,
}

/// Everything observable about one completed pass, for logging/telemetry
/// and for the caller to decide whether the rule should be removed
/// (`once`).
#[derive(Debug, Clone)]
pub struct PassResult {
    pub check_exit_code: i32,
    pub check_timed_out: bool,
    pub outcome: PassOutcome,
    pub action_exit_code: Option<i32>,
    pub remove_rule: bool,
}
