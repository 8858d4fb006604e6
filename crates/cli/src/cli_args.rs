// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kicker` — the rule-editing and lifecycle-control CLI.
//!
//! The daemon runtime (leader election, scheduling, triggers, logging) is
//! the core of this system; this crate is the thin, functional layer that
//! edits the persisted rule store and signals the running daemon. See
//! SPEC_FULL.md §4.8.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use kicker_daemon::DaemonArgs;

#[derive(Parser)]
#[command(name = "kicker", about = "kicker automation daemon — rule editor and lifecycle control")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a rule: a check script, an action script, and a trigger.
    Add(AddArgs),
    /// List the current rule set.
    List(ListArgs),
    /// Remove a rule by id. Remaining ids are not renumbered.
    Remove(RemoveArgs),
    /// Show per-rule counters (checks/actions/actions in the last 24h).
    Stats(StatsArgs),
    /// Stop the running daemon.
    Stop(StopArgs),
    /// Start the daemon (`kickerd`), forwarding supervisor flags.
    Run(RunArgs),
}

#[derive(clap::Args)]
pub struct AddArgs {
    /// Script whose exit code is observed on every poll.
    pub check_script: std::path::PathBuf,
    /// Script invoked when the trigger fires.
    pub action_script: std::path::PathBuf,

    /// Fire when the check exits zero.
    #[arg(long, group = "trigger")]
    pub if_zero: bool,
    /// Fire when the check exits nonzero.
    #[arg(long, group = "trigger")]
    pub if_nonzero: bool,
    /// Fire on a failing-to-passing transition (never on the first check).
    #[arg(long, group = "trigger")]
    pub if_fail_to_pass: bool,
    /// Fire on a passing-to-failing transition (never on the first check).
    #[arg(long, group = "trigger")]
    pub if_pass_to_fail: bool,
    /// Fire when the check exits with exactly this code.
    #[arg(long, value_name = "N", group = "trigger")]
    pub if_code: Option<i32>,

    /// Poll interval in seconds; inherits the daemon-wide default if unset.
    #[arg(long, value_name = "SECS")]
    pub every: Option<f64>,
    /// Rate limit as `count/window_seconds`, e.g. `2/5`.
    #[arg(long, value_name = "N/SECS")]
    pub rate: Option<String>,
    /// Timeout in seconds for both the check and the action.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,
    /// Remove this rule after its first successful action dispatch.
    #[arg(long)]
    pub once: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct RemoveArgs {
    pub id: u64,
}

#[derive(clap::Args)]
pub struct StatsArgs {
    /// Limit to a single rule id; omit to show every rule.
    pub id: Option<u64>,
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct StopArgs {
    /// Escalate to SIGKILL if the daemon has not exited after the grace period.
    #[arg(long)]
    pub force: bool,
    /// Suppress "no daemon running" noise; exit 0 either way.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Run `kickerd` in the foreground instead of detaching it.
    #[arg(long)]
    pub foreground: bool,

    /// Supervisor flags, forwarded verbatim to `kickerd` when detached.
    #[command(flatten)]
    pub daemon_args: DaemonArgs,
}
