// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem layout the CLI shares with the daemon: both honor the same
//! `KICKER_*` environment overrides (see [`kicker_core::env`]) so a test can
//! point `kicker` and `kickerd` at the same isolated tree.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Matches [`kicker_daemon::Config::default_poll_interval`]'s fallback: the
/// CLI has no running daemon to ask, so a freshly created store uses the
/// same constant the daemon would pick with no `--poll-interval` override.
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 60.0;

pub struct CliContext {
    pub config_file: PathBuf,
    pub state_dir: PathBuf,
    pub hostname: String,
}

impl CliContext {
    pub fn load() -> Result<Self> {
        let state_dir = kicker_core::env::state_dir_override()
            .or_else(kicker_core::paths::state_dir)
            .context("could not determine state directory (set KICKER_STATE_DIR)")?;
        let config_file = kicker_core::env::config_file_override()
            .or_else(kicker_core::paths::config_file)
            .context("could not determine config file path (set KICKER_CONFIG_FILE)")?;
        let hostname = kicker_core::env::hostname_override()
            .or_else(|| nix::unistd::gethostname().ok().map(|h| h.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "localhost".to_string());

        Ok(Self {
            config_file,
            state_dir,
            hostname,
        })
    }
}
