// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sliding-window rate limiter, used to cap how many actions a rule may
//! fire within a rolling time window.
//!
//! Ties (two candidate fires for the same rule within the same evaluation
//! pass) cannot occur: rule evaluation is serialized per rule by the
//! scheduler, so `check` is never called reentrantly.

use crate::rule::RateLimit;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Evaluate a candidate fire at `now` against `recent_fires` and `limit`,
/// mutating `recent_fires` in place: expired entries are dropped regardless
/// of the outcome, and the new entry is appended only if permitted.
///
/// Returns `true` if the fire is permitted.
pub fn try_fire(recent_fires: &mut VecDeque<DateTime<Utc>>, limit: RateLimit, now: DateTime<Utc>) -> bool {
    let window = chrono::Duration::seconds(limit.window_secs as i64);
    let cutoff = now - window;
    while matches!(recent_fires.front(), Some(t) if *t < cutoff) {
        recent_fires.pop_front();
    }

    if (recent_fires.len() as u32) < limit.count {
        recent_fires.push_back(now);
        true
    } else {
        false
    }
}

/// Stateless convenience wrapper kept for call sites that prefer an object
/// over a bare function (e.g. adapting to a trait-based scheduler). Holds
/// no state itself — the window is owned by the caller's
/// [`crate::rule::RuleRuntimeState`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RateLimiter;

impl RateLimiter {
    pub fn try_fire(&self, recent_fires: &mut VecDeque<DateTime<Utc>>, limit: RateLimit, now: DateTime<Utc>) -> bool {
        try_fire(recent_fires, limit, now)
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
