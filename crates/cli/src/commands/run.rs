// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kicker run`: locate and launch `kickerd`, forwarding the supervisor
//! flags. Binary resolution mirrors the teacher's `find_ojd_binary` —
//! explicit override, then a sibling of the current executable, then a
//! debug-build heuristic via `CARGO_MANIFEST_DIR`, then `PATH`.

use crate::cli_args::RunArgs;
use anyhow::{Context, Result};
use kicker_daemon::{DaemonArgs, LogFormatArg};
use std::path::PathBuf;
use std::process::{Command, Stdio};

pub fn execute(args: RunArgs) -> Result<()> {
    let kickerd = find_kickerd_binary();
    let argv = daemon_argv(&args.daemon_args);

    if args.foreground {
        let status = Command::new(&kickerd)
            .args(&argv)
            .status()
            .with_context(|| format!("failed to launch {}", kickerd.display()))?;
        std::process::exit(status.code().unwrap_or(1));
    }

    let child = Command::new(&kickerd)
        .args(&argv)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to launch {}", kickerd.display()))?;

    println!("started kickerd (pid {})", child.id());
    Ok(())
}

fn daemon_argv(args: &DaemonArgs) -> Vec<String> {
    let mut argv = vec![
        "--log-format".to_string(),
        match args.log_format {
            LogFormatArg::PlainText => "plain-text".to_string(),
            LogFormatArg::Json => "json".to_string(),
        },
        "--lease-seconds".to_string(),
        args.lease_seconds.to_string(),
        "--lease-grace-seconds".to_string(),
        args.lease_grace_seconds.to_string(),
    ];
    if let Some(interval) = args.poll_interval {
        argv.push("--poll-interval".to_string());
        argv.push(interval.to_string());
    }
    if args.quiet {
        argv.push("--quiet".to_string());
    }
    if args.verbose {
        argv.push("--verbose".to_string());
    }
    argv
}

fn find_kickerd_binary() -> PathBuf {
    if let Some(path) = kicker_core::env::kickerd_binary_override() {
        return path;
    }

    let current_exe = std::env::current_exe().ok();

    let is_debug_build = current_exe
        .as_ref()
        .and_then(|p| p.to_str())
        .map(|s| s.contains("target/debug"))
        .unwrap_or(false);

    if is_debug_build {
        if let Some(manifest_dir) = option_env!("CARGO_MANIFEST_DIR") {
            let dev_path = PathBuf::from(manifest_dir)
                .parent()
                .and_then(|p| p.parent())
                .map(|p| p.join("target/debug/kickerd"));
            if let Some(path) = dev_path {
                if path.exists() {
                    return path;
                }
            }
        }
    }

    if let Some(ref exe) = current_exe {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("kickerd");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    PathBuf::from("kickerd")
}
