// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log Writer (C5): the user-facing checks/actions logs, distinct from
//! C11's `tracing`-based daemon diagnostics. Two independent streams
//! (`kicker_checks.log`, `kicker_actions.log`) share this same writer type,
//! one instance each.

use chrono::{DateTime, Local};
use kicker_core::RuleId;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use thiserror::Error;

const ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const ROTATE_MIN_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum LogWriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    PlainText,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Check,
    Action,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// Wall-clock timestamp in the local offset (spec §4.6: "ISO-8601
    /// timestamp (wall clock, local offset)"), not UTC.
    pub timestamp: DateTime<Local>,
    pub rule_id: RuleId,
    pub script_name: String,
    pub phase: Phase,
    pub exit_code: i32,
    pub duration_ms: u64,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl LogRecord {
    fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Json => {
                let mut line = serde_json::to_string(self).expect("LogRecord serializes");
                line.push('\n');
                line
            }
            LogFormat::PlainText => {
                let mut out = format!(
                    "[{}] rule={} script={} phase={:?} exit_code={} duration_ms={} timed_out={}\n",
                    self.timestamp.to_rfc3339(),
                    self.rule_id,
                    self.script_name,
                    self.phase,
                    self.exit_code,
                    self.duration_ms,
                    self.timed_out,
                );
                for line in self.stdout.lines() {
                    out.push_str("    stdout| ");
                    out.push_str(line);
                    out.push('\n');
                }
                for line in self.stderr.lines() {
                    out.push_str("    stderr| ");
                    out.push_str(line);
                    out.push('\n');
                }
                out
            }
        }
    }

    /// True if this rendering starts a new record (used to find a safe trim
    /// boundary): NDJSON records are each a whole line; plain-text records
    /// each start with a `[` timestamp header.
    fn is_header_line(format: LogFormat, line: &str) -> bool {
        match format {
            LogFormat::Json => true,
            LogFormat::PlainText => line.starts_with('['),
        }
    }
}

/// Append-only log with size-capped, hourly-bounded rotation.
pub struct LogWriter {
    path: PathBuf,
    trim_marker_path: PathBuf,
    format: LogFormat,
    dropped: AtomicU64,
}

impl LogWriter {
    pub fn new(path: PathBuf, format: LogFormat) -> Self {
        let trim_marker_path = path.with_extension("trim_marker");
        Self {
            path,
            trim_marker_path,
            format,
            dropped: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Append a record, rotating first if the size and time thresholds are
    /// both exceeded. Retries the write once on failure; on a second
    /// failure the record is dropped and the dropped-record counter
    /// increments rather than crashing the event loop.
    pub fn append(&self, record: &LogRecord) -> Result<(), LogWriteError> {
        if let Err(e) = self.maybe_rotate() {
            tracing::warn!(error = %e, "log rotation failed, appending without rotating");
        }

        let line = record.render(self.format);
        match self.write_line(&line) {
            Ok(()) => Ok(()),
            Err(first_err) => match self.write_line(&line) {
                Ok(()) => Ok(()),
                Err(second_err) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        first_error = %first_err,
                        second_error = %second_err,
                        dropped_total = self.dropped_count(),
                        "dropping log record after repeated write failure"
                    );
                    Err(second_err.into())
                }
            },
        }
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.sync_all()
    }

    fn maybe_rotate(&self) -> std::io::Result<()> {
        let size = match fs::metadata(&self.path) {
            Ok(m) => m.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if size < ROTATE_SIZE_BYTES {
            return Ok(());
        }
        if !self.trim_due()? {
            return Ok(());
        }
        self.trim()?;
        self.touch_trim_marker()
    }

    fn trim_due(&self) -> std::io::Result<bool> {
        match fs::metadata(&self.trim_marker_path).and_then(|m| m.modified()) {
            Ok(last_trim) => Ok(SystemTime::now()
                .duration_since(last_trim)
                .unwrap_or(Duration::ZERO)
                >= ROTATE_MIN_INTERVAL),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Retain the last 50% of the file, snapped forward to the next record
    /// boundary so no record is split across the trim point.
    fn trim(&self) -> std::io::Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let midpoint = contents.len() / 2;
        let tail_start = match self.format {
            LogFormat::Json => contents[..midpoint]
                .rfind('\n')
                .map(|i| i + 1)
                .unwrap_or(0),
            LogFormat::PlainText => {
                let mut boundary = midpoint;
                loop {
                    match contents[boundary..].find('\n') {
                        Some(rel) => {
                            let candidate = boundary + rel + 1;
                            if candidate >= contents.len()
                                || LogRecord::is_header_line(
                                    self.format,
                                    contents[candidate..].lines().next().unwrap_or(""),
                                )
                            {
                                break candidate;
                            }
                            boundary = candidate;
                        }
                        None => break contents.len(),
                    }
                }
            }
        };
        crate::atomic_write::write_atomic(&self.path, contents[tail_start..].as_bytes())
    }

    fn touch_trim_marker(&self) -> std::io::Result<()> {
        File::create(&self.trim_marker_path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "log_writer_tests.rs"]
mod tests;
