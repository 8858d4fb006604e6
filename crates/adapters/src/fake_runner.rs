// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic [`ScriptRunner`] for scheduler/supervisor tests: no
//! process is ever spawned. Exit codes are queued per script path and
//! consumed in order, so a test can script a rule's check results across
//! several passes (e.g. `[1, 1, 0, 0]` for a fail-to-pass transition).

use crate::script_runner::{ScriptOutcome, ScriptRunner};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Default)]
pub struct FakeScriptRunner {
    queued: Mutex<HashMap<PathBuf, VecDeque<i32>>>,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the exit codes a script will return, one per call. Once
    /// drained, the last queued code repeats indefinitely (a rule that's
    /// polled past its scripted sequence keeps behaving like its final
    /// observed state, rather than silently reverting to success).
    pub fn queue_exit_codes(&self, script: impl Into<PathBuf>, codes: impl IntoIterator<Item = i32>) {
        self.queued.lock().insert(script.into(), codes.into_iter().collect());
    }

    pub fn call_count(&self, script: &Path) -> usize {
        self.calls.lock().iter().filter(|p| p.as_path() == script).count()
    }
}

#[async_trait]
impl ScriptRunner for FakeScriptRunner {
    async fn run(&self, script: &Path, _timeout: Duration, _cwd: &Path) -> ScriptOutcome {
        self.calls.lock().push(script.to_path_buf());

        let exit_code = {
            let mut queued = self.queued.lock();
            match queued.get_mut(script) {
                Some(codes) if codes.len() > 1 => codes.pop_front().unwrap_or(0),
                Some(codes) => *codes.front().unwrap_or(&0),
                None => 0,
            }
        };

        let now = Utc::now();
        ScriptOutcome {
            exit_code,
            stdout: String::new(),
            stderr: String::new(),
            started_at: now,
            finished_at: now,
            duration_ms: 0,
            timed_out: false,
        }
    }
}
