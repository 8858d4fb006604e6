// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-owned flags for `kickerd`, also forwarded through `kicker run`.

use clap::{Parser, ValueEnum};
use kicker_storage::LogFormat;

#[derive(Parser, Debug, Clone)]
#[command(name = "kickerd", about = "kicker automation daemon")]
pub struct DaemonArgs {
    /// Format for the checks/actions logs.
    #[arg(long, value_enum, default_value_t = LogFormatArg::PlainText)]
    pub log_format: LogFormatArg,

    /// Override the global default poll interval (never a rule's own
    /// explicit `poll_interval`).
    #[arg(long)]
    pub poll_interval: Option<f64>,

    /// Leader lease duration in seconds.
    #[arg(long, default_value_t = 60.0)]
    pub lease_seconds: f64,

    /// Extra time past `lease_expires_at` before a lease is considered
    /// reclaimable.
    #[arg(long, default_value_t = 10.0)]
    pub lease_grace_seconds: f64,

    /// Exit 0 instead of 1 when another instance already holds the lease.
    #[arg(long)]
    pub quiet: bool,

    /// Also emit lifecycle/per-rule diagnostics to stdout.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    #[default]
    PlainText,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::PlainText => LogFormat::PlainText,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
