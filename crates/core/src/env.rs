// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable overrides for the filesystem layout in
//! [`crate::paths`].
//!
//! Shared by the daemon and the CLI so tests (and anyone running two
//! `kickerd` instances deliberately, e.g. the leader-contention integration
//! test) can point both binaries at an isolated tree instead of the real
//! `$HOME`, without the two crates drifting out of sync on variable names.

use std::path::PathBuf;

pub fn home_dir_override() -> Option<PathBuf> {
    std::env::var("KICKER_HOME_DIR").ok().map(PathBuf::from)
}

pub fn config_file_override() -> Option<PathBuf> {
    std::env::var("KICKER_CONFIG_FILE").ok().map(PathBuf::from)
}

pub fn state_dir_override() -> Option<PathBuf> {
    std::env::var("KICKER_STATE_DIR").ok().map(PathBuf::from)
}

/// Hostname override, used by tests simulating two distinct hosts against
/// one shared (tempdir) state directory without needing two machines.
pub fn hostname_override() -> Option<String> {
    std::env::var("KICKER_HOSTNAME").ok()
}

/// Explicit path to the `kickerd` binary, used by `kicker run` and by tests
/// that need a debug build instead of whatever `kickerd` resolves to on
/// `PATH`.
pub fn kickerd_binary_override() -> Option<PathBuf> {
    std::env::var("KICKER_KICKERD_BIN").ok().map(PathBuf::from)
}
