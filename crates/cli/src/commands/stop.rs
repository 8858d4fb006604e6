// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kicker stop`: signals the running `kickerd` directly. There is no IPC
//! socket (see SPEC_FULL.md §4.8) — the daemon is reached exclusively
//! through `leader.json` and `SIGTERM`/`SIGKILL`, the same way the teacher's
//! CLI reaches its daemon by PID file and signal.

use crate::cli_args::StopArgs;
use crate::context::CliContext;
use anyhow::{bail, Context, Result};
use kicker_storage::LeaderLeaseStore;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

pub fn execute(ctx: &CliContext, args: StopArgs) -> Result<()> {
    // `lease_seconds`/`grace_seconds` only matter for acquiring or refreshing
    // a lease; reading and releasing one is unaffected by either value.
    let lease = LeaderLeaseStore::new(&ctx.state_dir, 60.0, 10.0);

    let Some(meta) = lease.read().context("failed to read leader metadata")? else {
        if args.quiet {
            return Ok(());
        }
        bail!("no daemon is running");
    };

    if meta.hostname != ctx.hostname {
        bail!(
            "the running daemon is on host {}, not {} — stop it from there",
            meta.hostname,
            ctx.hostname
        );
    }

    let pid = Pid::from_raw(meta.pid as i32);
    if !pid_alive(pid) {
        lease.release().context("failed to clear stale leader metadata")?;
        println!("cleared stale lock for a daemon that was no longer running (pid {})", meta.pid);
        return Ok(());
    }

    kill(pid, Signal::SIGTERM).context("failed to send SIGTERM")?;

    let deadline = Instant::now() + STOP_TIMEOUT;
    while Instant::now() < deadline {
        if lease.read()?.is_none() {
            println!("stopped daemon (pid {})", meta.pid);
            return Ok(());
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    if !pid_alive(pid) {
        lease.release().context("failed to clear stale leader metadata")?;
        println!("stopped daemon (pid {}, cleared stale lock)", meta.pid);
        return Ok(());
    }

    if args.force {
        kill(pid, Signal::SIGKILL).context("failed to send SIGKILL")?;
        let deadline = Instant::now() + STOP_TIMEOUT;
        while Instant::now() < deadline && pid_alive(pid) {
            std::thread::sleep(POLL_INTERVAL);
        }
        lease.release().context("failed to clear stale leader metadata")?;
        println!("force-stopped daemon (pid {})", meta.pid);
        return Ok(());
    }

    bail!(
        "daemon (pid {}) did not stop within {}s; retry with --force",
        meta.pid,
        STOP_TIMEOUT.as_secs()
    );
}

fn pid_alive(pid: Pid) -> bool {
    match kill(pid, None) {
        Ok(()) => true,
        Err(nix::errno::Errno::ESRCH) => false,
        Err(_) => true,
    }
}
