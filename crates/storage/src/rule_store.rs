// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule Store (C3): loads and persists the rule set at
//! `~/.config/kicker/config.yaml`.
//!
//! Both the CLI and the daemon go through this type, so a CLI edit racing
//! a daemon reload always sees a complete, atomically-written file: writers
//! never observe a half-written document because [`RuleStore::save`] writes
//! to a temp file and renames it into place.

use kicker_core::RuleSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rule store: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Handle to the on-disk rule store.
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the rule set. If the file does not exist, returns a fresh,
    /// empty set rather than erroring — a brand-new `kicker` install has no
    /// store yet.
    pub fn load(&self, default_poll_interval: f64) -> Result<RuleSet, RuleStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let mut rules: RuleSet = serde_yaml::from_str(&contents)?;
                // Guards against a store written before `next_id` existed,
                // or hand-edited: never hand out an id that collides with
                // one already on disk.
                rules.repair_next_id();
                Ok(rules)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(RuleSet::new(default_poll_interval))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the rule set atomically (write to `.tmp`, then rename).
    pub fn save(&self, rules: &RuleSet) -> Result<(), RuleStoreError> {
        let yaml = serde_yaml::to_string(rules)?;
        crate::atomic_write::write_atomic(&self.path, yaml.as_bytes())?;
        Ok(())
    }

    /// Modification time of the store file, used by the daemon to decide
    /// whether to reload on SIGHUP or on its periodic mtime check.
    /// Returns `None` if the file does not yet exist.
    pub fn mtime(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(test)]
#[path = "rule_store_tests.rs"]
mod tests;
