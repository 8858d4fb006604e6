// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leader Lease Store (C2): NFS-safe single-instance election.
//!
//! The primitive is atomic *directory* creation at a fixed path
//! (`leader.lock/`), which is atomic over NFSv3+ when contended — unlike
//! exclusive-open file flags, which are not reliably atomic across all NFS
//! clients. A metadata file (`leader.json`) is written inside the
//! directory once creation succeeds.
//!
//! Staleness (a holder that crashed without releasing) is handled by
//! expiry-plus-grace: [`LeaderLeaseStore::try_acquire`] reclaims a stale
//! lock directory and retries the creation once, bounded to avoid thrash
//! between two hosts racing the same reclaim. This folds the spec's
//! separately-named `Stale` outcome into the acquisition algorithm itself
//! rather than surfacing it to the caller — see DESIGN.md.

use kicker_core::LeaderMetadata;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum LeaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse leader metadata: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("refresh observed foreign metadata: lease now held by {hostname}:{pid}")]
    SplitBrain { hostname: String, pid: u32 },
}

/// Outcome of a single-instance election attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// This process now holds the lease.
    Acquired,
    /// Another live process holds the lease.
    HeldBy(LeaderMetadata),
}

pub struct LeaderLeaseStore {
    lock_dir: PathBuf,
    meta_path: PathBuf,
    lease_seconds: f64,
    grace_seconds: f64,
}

impl LeaderLeaseStore {
    pub fn new(state_dir: &Path, lease_seconds: f64, grace_seconds: f64) -> Self {
        let lock_dir = state_dir.join("leader.lock");
        let meta_path = lock_dir.join("leader.json");
        Self {
            lock_dir,
            meta_path,
            lease_seconds,
            grace_seconds,
        }
    }

    /// Attempt to become leader. See module docs for the staleness
    /// resolution strategy.
    pub fn try_acquire(&self, hostname: &str, pid: u32, now_unix: i64) -> Result<AcquireOutcome, LeaseError> {
        match self.create_and_write(hostname, pid, now_unix) {
            Ok(()) => return Ok(AcquireOutcome::Acquired),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        let existing = self.read()?;
        let Some(meta) = existing else {
            // Lock directory exists but metadata is missing or unreadable:
            // a crash occurred mid-acquire. Reclaim and retry once.
            warn!("leader lock directory exists with no readable metadata, reclaiming");
            return self.reclaim_and_retry(hostname, pid, now_unix);
        };

        if meta.is_stale(now_unix, self.grace_seconds) {
            info!(holder = %format!("{}:{}", meta.hostname, meta.pid), "reclaiming stale lease");
            return self.reclaim_and_retry(hostname, pid, now_unix);
        }

        Ok(AcquireOutcome::HeldBy(meta))
    }

    /// Bounded single retry after removing a stale/unreadable lock
    /// directory. If the retry loses a race to another host, returns
    /// `HeldBy` with whatever metadata the winner left behind.
    fn reclaim_and_retry(&self, hostname: &str, pid: u32, now_unix: i64) -> Result<AcquireOutcome, LeaseError> {
        // Best-effort: another host may remove it first, that's fine.
        let _ = fs::remove_dir_all(&self.lock_dir);

        match self.create_and_write(hostname, pid, now_unix) {
            Ok(()) => Ok(AcquireOutcome::Acquired),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                match self.read()? {
                    Some(meta) => Ok(AcquireOutcome::HeldBy(meta)),
                    None => Err(LeaseError::Io(std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "lock directory recreated with unreadable metadata during reclaim",
                    ))),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn create_and_write(&self, hostname: &str, pid: u32, now_unix: i64) -> std::io::Result<()> {
        fs::create_dir(&self.lock_dir)?;
        let meta = LeaderMetadata {
            hostname: hostname.to_string(),
            pid,
            start_time_unix: now_unix,
            lease_expires_at_unix: now_unix + self.lease_seconds.round() as i64,
        };
        self.write_meta(&meta)
    }

    fn write_meta(&self, meta: &LeaderMetadata) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(meta)?;
        crate::atomic_write::write_atomic(&self.meta_path, &json)
    }

    /// Rewrite `leader.json` with an extended `lease_expires_at`. Fails
    /// with [`LeaseError::SplitBrain`] if the on-disk metadata no longer
    /// names this process — another daemon stole the lease, most likely
    /// during a clock anomaly, and this process must abdicate immediately
    /// rather than fight for it.
    pub fn refresh(&self, hostname: &str, pid: u32, now_unix: i64) -> Result<(), LeaseError> {
        let Some(meta) = self.read()? else {
            return Err(LeaseError::SplitBrain {
                hostname: "<none>".to_string(),
                pid: 0,
            });
        };

        if !meta.identifies(hostname, pid) {
            return Err(LeaseError::SplitBrain {
                hostname: meta.hostname,
                pid: meta.pid,
            });
        }

        let updated = LeaderMetadata {
            lease_expires_at_unix: now_unix + self.lease_seconds.round() as i64,
            ..meta
        };
        self.write_meta(&updated)?;
        Ok(())
    }

    /// Release the lease: remove the lock directory entirely. Best-effort
    /// on I/O errors — shutdown must not get stuck on a filesystem hiccup.
    pub fn release(&self) -> Result<(), LeaseError> {
        match fs::remove_dir_all(&self.lock_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn read(&self) -> Result<Option<LeaderMetadata>, LeaseError> {
        match fs::read(&self.meta_path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "leader_store_tests.rs"]
mod tests;
