// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction: monotonic time for scheduling, wall clock for logging
//! and rate-limit windows.
//!
//! Scheduling must never observe an NTP step; rate-limit windows and log
//! timestamps must be human-meaningful. The two clocks are deliberately
//! separate types so a test cannot accidentally compare one against the
//! other.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Abstraction over monotonic and wall-clock time, so scheduling logic can
/// be tested without real sleeps.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Monotonic instant, immune to clock steps. Used for scheduling.
    fn monotonic_now(&self) -> Instant;

    /// Wall-clock time, used for log timestamps and rate-limit windows.
    fn wall_now(&self) -> DateTime<Utc>;
}

/// Real clock backed by the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn monotonic_now(&self) -> Instant {
        Instant::now()
    }

    fn wall_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests. `monotonic_now` is derived from an
/// internal `Instant` base plus an offset so it can be advanced without
/// sleeping; `wall_now` is advanced in lockstep by default but can be set
/// independently to exercise clock-skew scenarios.
#[derive(Debug, Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeClockState>>,
}

#[derive(Debug)]
struct FakeClockState {
    base_instant: Instant,
    monotonic_offset: Duration,
    wall: DateTime<Utc>,
}

impl FakeClock {
    /// Construct a fake clock starting at the given wall-clock time.
    pub fn new(wall_start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClockState {
                base_instant: Instant::now(),
                monotonic_offset: Duration::ZERO,
                wall: wall_start,
            })),
        }
    }

    /// Advance both the monotonic and wall clocks by `d`.
    pub fn advance(&self, d: Duration) {
        let mut state = self.inner.lock();
        state.monotonic_offset += d;
        state.wall += chrono::Duration::from_std(d).unwrap_or_default();
    }

    /// Advance only the wall clock, leaving monotonic time untouched.
    /// Used to simulate an NTP step without affecting scheduling.
    pub fn step_wall_only(&self, d: chrono::Duration) {
        self.inner.lock().wall += d;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for FakeClock {
    fn monotonic_now(&self) -> Instant {
        let state = self.inner.lock();
        state.base_instant + state.monotonic_offset
    }

    fn wall_now(&self) -> DateTime<Utc> {
        self.inner.lock().wall
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
