//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for testing `kicker`/`kickerd` behavior
//! against an isolated, tempdir-backed filesystem — no test ever touches a
//! developer's real `$HOME`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, Instant};

pub const SPEC_POLL_INTERVAL_MS: u64 = 20;
pub const SPEC_WAIT_MAX_MS: u64 = 3000;

/// Resolves a workspace binary, preferring the debug build next to this test
/// binary over whatever `CARGO_MANIFEST_DIR` happens to point at (keeps
/// working under `cargo llvm-cov` and similar out-of-tree builds).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

pub fn kicker_binary() -> PathBuf {
    binary_path("kicker")
}

pub fn kickerd_binary() -> PathBuf {
    binary_path("kickerd")
}

/// An isolated `kicker` home: its own config dir, state dir, and hostname,
/// so concurrent test runs (and the two-host leader-contention spec) never
/// collide.
pub struct Harness {
    _root: tempfile::TempDir,
    config_dir: PathBuf,
    state_dir: PathBuf,
    hostname: String,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_hostname("test-host")
    }

    pub fn with_hostname(hostname: &str) -> Self {
        let root = tempfile::tempdir().unwrap();
        let config_dir = root.path().join("config");
        let state_dir = root.path().join("state");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::create_dir_all(&state_dir).unwrap();
        Self {
            _root: root,
            config_dir,
            state_dir,
            hostname: hostname.to_string(),
        }
    }

    /// A second handle onto the *same* state/config directories but a
    /// different hostname, for simulating two hosts sharing NFS-mounted
    /// state without needing two machines.
    pub fn shared_host(&self, hostname: &str) -> Harness {
        Harness {
            _root: tempfile::tempdir().unwrap(),
            config_dir: self.config_dir.clone(),
            state_dir: self.state_dir.clone(),
            hostname: hostname.to_string(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn write_config(&self, yaml: &str) {
        std::fs::write(self.config_file(), yaml).unwrap();
    }

    /// Write an executable shell script under the config dir's `scripts/`
    /// convention directory and return its path.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let dir = self.config_dir.join("scripts");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn envs(&self) -> Vec<(String, String)> {
        vec![
            ("KICKER_HOME_DIR".into(), self._root.path().to_string_lossy().into_owned()),
            ("KICKER_CONFIG_FILE".into(), self.config_file().to_string_lossy().into_owned()),
            ("KICKER_STATE_DIR".into(), self.state_dir.to_string_lossy().into_owned()),
            ("KICKER_HOSTNAME".into(), self.hostname.clone()),
            ("KICKER_KICKERD_BIN".into(), kickerd_binary().to_string_lossy().into_owned()),
        ]
    }

    /// Build a `kicker` invocation against this harness.
    pub fn kicker(&self) -> CliBuilder {
        CliBuilder::new(kicker_binary(), self.envs())
    }

    /// Build a raw `kickerd` invocation against this harness, bypassing
    /// `kicker run` — used by specs that need to block on the daemon's own
    /// exit code directly.
    pub fn kickerd(&self) -> CliBuilder {
        CliBuilder::new(kickerd_binary(), self.envs())
    }

    pub fn leader_json(&self) -> Option<serde_json::Value> {
        let path = self.state_dir.join("leader.lock").join("leader.json");
        let bytes = std::fs::read(path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn daemon_is_running(&self) -> bool {
        self.leader_json().is_some()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        // Best-effort: stop whatever this harness's hostname may have
        // started, so a failing assertion never leaks a background
        // `kickerd` into the next test.
        let mut cmd = self.kicker().args(&["stop", "--quiet", "--force"]).command();
        cmd.stdout(std::process::Stdio::null());
        cmd.stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}

pub struct CliBuilder {
    bin: PathBuf,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new(bin: PathBuf, envs: Vec<(String, String)>) -> Self {
        Self { bin, args: Vec::new(), envs }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn command(self) -> Command {
        let mut cmd = Command::new(self.bin);
        cmd.args(&self.args);
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run without asserting on the exit code, for commands whose exit code
    /// itself is under test (e.g. `kicker run --quiet` against a contended
    /// lease).
    pub fn run(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }
}

/// Poll a condition until it returns true or the timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    let poll_interval = Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}
