// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script Runner (C4): spawns a check or action script in its own process
//! group, with a fixed working directory, a capped output buffer per
//! stream, and a SIGTERM-then-SIGKILL timeout escalation.
//!
//! The process group (rather than the bare child pid) is what gets
//! signaled on timeout: a script that forks children of its own (a
//! wrapper shell, `sleep`, a pipeline) would otherwise survive its
//! parent's death.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Per-stream cap on captured stdout/stderr. Excess is discarded (to avoid
/// blocking a script whose pipe buffer fills) and a marker line is
/// appended so the log makes the truncation visible.
pub const OUTPUT_CAP_BYTES: usize = 1024 * 1024;

/// How long to wait after SIGTERM before escalating to SIGKILL.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// Exit code reported, by convention, for a timed-out script.
const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code reported, by convention, for a script that could not be
/// spawned at all (not found, not executable, bad interpreter line).
const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// The result of running a single check or action script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub timed_out: bool,
}

/// Abstraction over script execution so the scheduler can be tested
/// against a fake without spawning real processes.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, script: &Path, timeout: Duration, cwd: &Path) -> ScriptOutcome;
}

/// Real implementation: spawns the script as a child of the current
/// process, inheriting the parent environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessScriptRunner;

#[async_trait]
impl ScriptRunner for ProcessScriptRunner {
    async fn run(&self, script: &Path, timeout: Duration, cwd: &Path) -> ScriptOutcome {
        let started_at = Utc::now();
        let clock = Instant::now();

        let mut command = Command::new(script);
        command
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Safety: setpgid(0, 0) only touches the child's own process
        // state post-fork, before exec; it makes the script the leader of
        // a new process group so the whole group can be signaled later.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setpgid(nix::unistd::Pid::from_raw(0), nix::unistd::Pid::from_raw(0))
                    .map_err(|errno| std::io::Error::from_raw_os_error(errno as i32))
            });
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(error) => {
                tracing::warn!(script = %script.display(), %error, "script not found or not executable");
                return ScriptOutcome {
                    exit_code: SPAWN_FAILURE_EXIT_CODE,
                    stdout: String::new(),
                    stderr: String::new(),
                    started_at,
                    finished_at: Utc::now(),
                    duration_ms: elapsed_ms(clock),
                    timed_out: false,
                };
            }
        };

        let pgid = child.id().map(|pid| pid as i32);
        let stdout_task = tokio::spawn(read_capped(child.stdout.take()));
        let stderr_task = tokio::spawn(read_capped(child.stderr.take()));

        let (exit_code, timed_out) = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => (exit_status_to_code(status), false),
            Ok(Err(error)) => {
                tracing::warn!(script = %script.display(), %error, "error waiting on script");
                (SPAWN_FAILURE_EXIT_CODE, false)
            }
            Err(_elapsed) => {
                escalate_to_group_kill(pgid, &mut child).await;
                (TIMEOUT_EXIT_CODE, true)
            }
        };

        ScriptOutcome {
            exit_code,
            stdout: stdout_task.await.unwrap_or_default(),
            stderr: stderr_task.await.unwrap_or_default(),
            started_at,
            finished_at: Utc::now(),
            duration_ms: elapsed_ms(clock),
            timed_out,
        }
    }
}

/// SIGTERM the process group, give it [`KILL_GRACE`] to exit, then SIGKILL
/// if it's still alive.
async fn escalate_to_group_kill(pgid: Option<i32>, child: &mut tokio::process::Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pgid) = pgid else {
        let _ = child.start_kill();
        let _ = child.wait().await;
        return;
    };

    let _ = killpg(Pid::from_raw(pgid), Signal::SIGTERM);
    if tokio::time::timeout(KILL_GRACE, child.wait()).await.is_err() {
        let _ = killpg(Pid::from_raw(pgid), Signal::SIGKILL);
        let _ = child.wait().await;
    }
}

fn exit_status_to_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

fn elapsed_ms(clock: Instant) -> u64 {
    clock.elapsed().as_millis() as u64
}

/// Read a pipe to completion, capping the retained bytes at
/// [`OUTPUT_CAP_BYTES`] and discarding (but still draining, so the child
/// never blocks on a full pipe buffer) anything past the cap.
async fn read_capped(reader: Option<impl tokio::io::AsyncRead + Unpin>) -> String {
    let Some(mut reader) = reader else {
        return String::new();
    };

    let mut buf = Vec::with_capacity(OUTPUT_CAP_BYTES.min(64 * 1024));
    let mut chunk = [0u8; 8192];
    let mut truncated = false;
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() < OUTPUT_CAP_BYTES {
                    let take = (OUTPUT_CAP_BYTES - buf.len()).min(n);
                    buf.extend_from_slice(&chunk[..take]);
                    if take < n {
                        truncated = true;
                    }
                } else {
                    truncated = true;
                }
            }
            Err(_) => break,
        }
    }

    let mut out = String::from_utf8_lossy(&buf).into_owned();
    if truncated {
        out.push_str(&format!(
            "\n... [output truncated, exceeded {OUTPUT_CAP_BYTES} byte cap]\n"
        ));
    }
    out
}

#[cfg(test)]
#[path = "script_runner_tests.rs"]
mod tests;
