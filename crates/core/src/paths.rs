// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem layout shared by the daemon and the CLI: both must agree on
//! where the rule store, the scripts convention directory, and the state
//! directory (leader lease, logs) live without either one hardcoding the
//! other's defaults.

use std::path::PathBuf;

/// The invoking user's home directory. Scripts are always spawned with
/// this as their working directory, regardless of where `kicker`/`kickerd`
/// itself was launched from.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// `~/.config/kicker`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kicker"))
}

/// `~/.config/kicker/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.yaml"))
}

/// `~/.config/kicker/scripts` — convention only; rules may point anywhere
/// executable.
pub fn scripts_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join("scripts"))
}

/// `~/.local/state/kicker`
pub fn state_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(|| dirs::data_local_dir())
        .map(|d| d.join("kicker"))
}

/// `~/.local/state/kicker/leader.json`
pub fn leader_metadata_file(state_dir: &std::path::Path) -> PathBuf {
    state_dir.join("leader.json")
}

/// `~/.local/state/kicker/kicker_checks.log`
pub fn checks_log_file(state_dir: &std::path::Path) -> PathBuf {
    state_dir.join("kicker_checks.log")
}

/// `~/.local/state/kicker/kicker_actions.log`
pub fn actions_log_file(state_dir: &std::path::Path) -> PathBuf {
    state_dir.join("kicker_actions.log")
}

/// `~/.local/state/kicker/kicker_daemon.log` — the daemon's own
/// `tracing` diagnostics, independent of the user-facing checks/actions
/// logs above.
pub fn daemon_log_file(state_dir: &std::path::Path) -> PathBuf {
    state_dir.join("kicker_daemon.log")
}

/// `~/.local/state/kicker/kicker_stats.json` — the `RuleRuntimeState`
/// counters snapshot the daemon writes so `kicker stats` can read them
/// out-of-process.
pub fn stats_file(state_dir: &std::path::Path) -> PathBuf {
    state_dir.join("kicker_stats.json")
}
