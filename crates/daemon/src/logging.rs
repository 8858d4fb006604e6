// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Telemetry (C11): daemon-internal `tracing` diagnostics, routed to
//! `kicker_daemon.log` via a non-blocking appender — deliberately separate
//! from the user-facing checks/actions logs, which exist for a human to
//! read with `less`, not for the daemon's own lifecycle events.

use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DAEMON_LOG_FILE_NAME: &str = "kicker_daemon.log";

/// Install the global `tracing` subscriber. Returns the non-blocking
/// writer's guard, which must be held for the life of the process — once
/// dropped, buffered log lines stop flushing.
pub fn setup_logging(
    state_dir: &Path,
    verbose: bool,
) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(state_dir)?;

    let file_appender = tracing_appender::rolling::never(state_dir, DAEMON_LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = verbose.then(|| fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(stdout_layer)
        .init();

    Ok(guard)
}
