// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::rule::{RateLimit, Rule, RuleId, TriggerMode};
use std::path::PathBuf;

/// A minimal, valid rule for tests: both scripts are plain paths (tests
/// that actually execute them should point these at real fixture
/// scripts), `poll_interval`/`rate_limit`/`timeout` unset so they inherit
/// daemon-wide defaults.
pub fn sample_rule(id: u64, trigger: TriggerMode) -> Rule {
    Rule {
        id: RuleId::new(id),
        check_script: PathBuf::from("/home/test/check.sh"),
        action_script: PathBuf::from("/home/test/action.sh"),
        trigger,
        poll_interval_secs: None,
        rate_limit: None,
        timeout_secs: None,
        once: false,
        original_spec: trigger.describe(),
    }
}

/// Builder-style variant for tests that need to tweak a handful of
/// fields without repeating the whole struct literal.
pub struct RuleBuilder(Rule);

impl RuleBuilder {
    pub fn new(id: u64, trigger: TriggerMode) -> Self {
        Self(sample_rule(id, trigger))
    }

    pub fn check_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.0.check_script = path.into();
        self
    }

    pub fn action_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.0.action_script = path.into();
        self
    }

    pub fn poll_interval_secs(mut self, secs: f64) -> Self {
        self.0.poll_interval_secs = Some(secs);
        self
    }

    pub fn rate_limit(mut self, count: u32, window_secs: u64) -> Self {
        self.0.rate_limit = Some(RateLimit::new(count, window_secs));
        self
    }

    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.0.timeout_secs = Some(secs);
        self
    }

    pub fn once(mut self) -> Self {
        self.0.once = true;
        self
    }

    pub fn build(self) -> Rule {
        self.0
    }
}
