// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stats sidecar: the only channel through which `kicker stats` observes
//! `RuleRuntimeState` counters without talking to the running daemon — there
//! is no IPC socket (see DESIGN.md), so the daemon writes a snapshot here
//! after every pass and the CLI reads it out-of-process.

use kicker_core::RuleId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse stats sidecar: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One rule's counters as of the daemon's last write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStats {
    pub checks: u64,
    pub actions: u64,
    pub actions_last_24h: u64,
}

/// Handle to `kicker_stats.json`. Written only by the current leader;
/// readers tolerate a missing file (no daemon has run yet).
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last snapshot, or an empty map if the daemon has never
    /// written one.
    pub fn load(&self) -> Result<HashMap<RuleId, RuleStats>, StatsStoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the full snapshot atomically (write to `.tmp`, then rename).
    pub fn save(&self, stats: &HashMap<RuleId, RuleStats>) -> Result<(), StatsStoreError> {
        let json = serde_json::to_vec_pretty(stats)?;
        crate::atomic_write::write_atomic(&self.path, &json)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "stats_store_tests.rs"]
mod tests;
