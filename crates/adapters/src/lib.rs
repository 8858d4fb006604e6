// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kicker-adapters: the Script Runner (C4) — the only component of this
//! daemon that touches a real OS process. Everything else in the
//! workspace depends on the [`ScriptRunner`] trait, not on
//! [`ProcessScriptRunner`] directly, so the scheduler can be tested
//! against [`FakeScriptRunner`] without spawning anything.

mod script_runner;

#[cfg(any(test, feature = "test-support"))]
mod fake_runner;

pub use script_runner::{ProcessScriptRunner, ScriptOutcome, ScriptRunner, OUTPUT_CAP_BYTES};

#[cfg(any(test, feature = "test-support"))]
pub use fake_runner::FakeScriptRunner;
