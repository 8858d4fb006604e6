// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon Supervisor (C9): acquires the leader lease, wires C1-C8 together
//! into one cooperative event loop, and releases the lease on shutdown.

use crate::config::Config;
use chrono::Utc;
use kicker_adapters::ProcessScriptRunner;
use kicker_core::paths;
use kicker_core::{Clock, SystemClock};
use kicker_engine::{PassContext, Scheduler};
use kicker_storage::{
    AcquireOutcome, LeaderLeaseStore, LeaseError, LogWriter, RuleStore, RuleStoreError, StatsStore,
};
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Lease(#[from] LeaseError),
    #[error(transparent)]
    RuleStore(#[from] RuleStoreError),
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] std::io::Error),
}

/// What happened over the life of the process, for `main` to translate into
/// an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// The event loop ran and shut down cleanly (signal-driven).
    ShutDown,
    /// Another live daemon already holds the lease for this state directory.
    AlreadyRunning,
}

/// Run the daemon to completion: acquire the lease, run the event loop
/// until a termination signal arrives or a fatal error occurs, then release
/// the lease. Mirrors the §4.7 startup/shutdown contract.
pub async fn run(config: Config) -> Result<StartupOutcome, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    let pid = std::process::id();
    let lease = LeaderLeaseStore::new(&config.state_dir, config.lease_seconds, config.lease_grace_seconds);

    match lease.try_acquire(&config.hostname, pid, Utc::now().timestamp())? {
        AcquireOutcome::Acquired => {
            info!(hostname = %config.hostname, pid, "acquired leader lease");
        }
        AcquireOutcome::HeldBy(meta) => {
            info!(
                holder_hostname = %meta.hostname,
                holder_pid = meta.pid,
                "another kickerd instance already holds the lease, exiting"
            );
            return Ok(StartupOutcome::AlreadyRunning);
        }
    }

    let result = run_event_loop(&config, &lease, pid).await;

    if let Err(ref e) = result {
        error!(error = %e, "event loop exited with a fatal error");
    }

    // A split-brain shutdown must not release the lease: the metadata on
    // disk already belongs to whichever daemon stole it, and removing the
    // lock directory would destroy *their* claim, not ours.
    let split_brain = matches!(result, Err(LifecycleError::Lease(LeaseError::SplitBrain { .. })));
    if split_brain {
        warn!("split-brain detected on refresh, abdicating without releasing the lease");
    } else if let Err(e) = lease.release() {
        warn!(error = %e, "failed to release leader lease on shutdown");
    } else {
        info!("released leader lease");
    }

    result.map(|()| StartupOutcome::ShutDown)
}

async fn run_event_loop(config: &Config, lease: &LeaderLeaseStore, pid: u32) -> Result<(), LifecycleError> {
    let rule_store = RuleStore::new(config.config_file.clone());
    let default_poll_interval = config.default_poll_interval();
    let rules = rule_store.load(default_poll_interval)?;
    let mut rule_store_mtime = rule_store.mtime();

    info!(rule_count = rules.rules.len(), "loaded rule store");

    let runner = ProcessScriptRunner;
    let checks_log = LogWriter::new(paths::checks_log_file(&config.state_dir), config.log_format);
    let actions_log = LogWriter::new(paths::actions_log_file(&config.state_dir), config.log_format);
    let stats_store = StatsStore::new(paths::stats_file(&config.state_dir));
    let clock = SystemClock;

    let mut scheduler = Scheduler::new(rules, clock.monotonic_now());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    let refresh_interval = Duration::from_secs_f64((config.lease_seconds / 3.0).max(1.0));
    let mut refresh_timer = tokio::time::interval(refresh_interval);
    refresh_timer.tick().await; // first tick fires immediately; lease was just acquired

    loop {
        let now = clock.monotonic_now();
        let sleep_for = scheduler.next_wakeup(now).saturating_duration_since(now);

        tokio::select! {
            _ = tokio::time::sleep(sleep_for) => {}
            _ = refresh_timer.tick() => {
                lease.refresh(&config.hostname, pid, Utc::now().timestamp())?;
                continue;
            }
            _ = sighup.recv() => {
                info!("received SIGHUP, checking rule store for changes");
                reload_if_changed(&rule_store, &mut scheduler, &mut rule_store_mtime, default_poll_interval, &clock);
                continue;
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down after the in-flight pass");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down after the in-flight pass");
                break;
            }
        }

        reload_if_changed(&rule_store, &mut scheduler, &mut rule_store_mtime, default_poll_interval, &clock);

        let now = clock.monotonic_now();
        let due = scheduler.due_rule_ids(now);
        for id in due {
            let ctx = PassContext {
                runner: &runner,
                checks_log: &checks_log,
                actions_log: &actions_log,
                clock: &clock,
                home_dir: &config.home_dir,
            };
            let Some(result) = scheduler.run_pass(id, &ctx).await else {
                continue;
            };
            if result.remove_rule {
                scheduler.remove_rule(id);
                if let Err(e) = rule_store.save(scheduler.rule_set()) {
                    warn!(error = %e, rule_id = %id, "failed to persist removal of a `once` rule");
                }
            }

            let snapshot = scheduler.stats_snapshot(clock.wall_now());
            if let Err(e) = stats_store.save(&snapshot) {
                warn!(error = %e, "failed to persist stats sidecar");
            }
        }
    }

    Ok(())
}

/// Reload the rule store if its mtime changed since the last check,
/// preserving the runtime state of rules that survive the reload. A parse
/// error keeps the previous rule set in memory rather than crashing the
/// loop — an operator mid-edit of `config.yaml` should not take the daemon
/// down.
fn reload_if_changed(
    rule_store: &RuleStore,
    scheduler: &mut Scheduler,
    last_mtime: &mut Option<SystemTime>,
    default_poll_interval: f64,
    clock: &dyn Clock,
) {
    let mtime = rule_store.mtime();
    if mtime == *last_mtime {
        return;
    }
    *last_mtime = mtime;

    match rule_store.load(default_poll_interval) {
        Ok(new_rules) => {
            info!(rule_count = new_rules.rules.len(), "reloaded rule store");
            scheduler.reload(new_rules, clock.monotonic_now());
        }
        Err(e) => {
            warn!(error = %e, "rule store failed to parse, keeping previous rule set");
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
