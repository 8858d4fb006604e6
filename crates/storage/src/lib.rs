// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kicker-storage: on-disk persistence for the rule store, the leader
//! lease, and the checks/actions logs.

mod atomic_write;
pub mod leader_store;
pub mod log_writer;
pub mod rule_store;
pub mod stats_store;

pub use leader_store::{AcquireOutcome, LeaderLeaseStore, LeaseError};
pub use log_writer::{LogFormat, LogRecord, LogWriteError, LogWriter};
pub use rule_store::{RuleStore, RuleStoreError};
pub use stats_store::{RuleStats, StatsStore, StatsStoreError};
