// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved daemon configuration: filesystem layout plus the supervisor
//! flags from [`crate::cli_args::DaemonArgs`].

use crate::cli_args::DaemonArgs;
use kicker_core::env;
use kicker_core::paths;
use kicker_storage::LogFormat;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory (set KICKER_HOME_DIR or HOME)")]
    NoHomeDir,
    #[error("could not determine state directory (set KICKER_STATE_DIR)")]
    NoStateDir,
    #[error("could not determine config file path (set KICKER_CONFIG_FILE)")]
    NoConfigFile,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub home_dir: PathBuf,
    pub config_file: PathBuf,
    pub state_dir: PathBuf,
    pub hostname: String,
    pub log_format: LogFormat,
    pub poll_interval_override: Option<f64>,
    pub lease_seconds: f64,
    pub lease_grace_seconds: f64,
    pub quiet: bool,
    pub verbose: bool,
}

impl Config {
    pub fn load(args: &DaemonArgs) -> Result<Self, ConfigError> {
        let home_dir = env::home_dir_override()
            .or_else(paths::home_dir)
            .ok_or(ConfigError::NoHomeDir)?;
        let state_dir = env::state_dir_override()
            .or_else(paths::state_dir)
            .ok_or(ConfigError::NoStateDir)?;
        let config_file = env::config_file_override()
            .or_else(paths::config_file)
            .ok_or(ConfigError::NoConfigFile)?;
        let hostname = env::hostname_override()
            .or_else(|| nix::unistd::gethostname().ok().map(|h| h.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "localhost".to_string());

        Ok(Self {
            home_dir,
            config_file,
            state_dir,
            hostname,
            log_format: args.log_format.into(),
            poll_interval_override: args.poll_interval,
            lease_seconds: args.lease_seconds,
            lease_grace_seconds: args.lease_grace_seconds,
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }

    /// The global default poll interval rules inherit when they set none of
    /// their own: the CLI override if given, otherwise 60s.
    pub fn default_poll_interval(&self) -> f64 {
        self.poll_interval_override.unwrap_or(60.0)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
