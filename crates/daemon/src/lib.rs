// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kickerd: the Daemon Supervisor (C9) that wires the leader lease (C2),
//! rule store (C3), script runner (C4), log writer (C5), and rule
//! scheduler (C8) into one cooperative event loop, plus the telemetry
//! (C11) that observes it.

mod cli_args;
mod config;
mod logging;
mod supervisor;

pub use cli_args::{DaemonArgs, LogFormatArg};
pub use config::{Config, ConfigError};
pub use logging::setup_logging;
pub use supervisor::{run, LifecycleError, StartupOutcome};
