// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kickerd — the kicker automation daemon.
//!
//! Typically started via `kicker run`, not invoked directly. Flags are
//! documented in [`kicker_daemon::DaemonArgs`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use kicker_daemon::{setup_logging, Config, DaemonArgs, StartupOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let args = DaemonArgs::parse();

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("kickerd: {e}");
            return std::process::ExitCode::from(2);
        }
    };

    let _log_guard = match setup_logging(&config.state_dir, config.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("kickerd: failed to set up logging: {e}");
            return std::process::ExitCode::from(1);
        }
    };

    let quiet = config.quiet;

    match kicker_daemon::run(config).await {
        Ok(StartupOutcome::ShutDown) => {
            tracing::info!("daemon stopped");
            std::process::ExitCode::SUCCESS
        }
        Ok(StartupOutcome::AlreadyRunning) => {
            if quiet {
                std::process::ExitCode::SUCCESS
            } else {
                eprintln!("kickerd: another instance already holds the leader lease");
                std::process::ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "daemon exited with a fatal error");
            std::process::ExitCode::from(1)
        }
    }
}
