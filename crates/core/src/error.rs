// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared across the core data model.

use thiserror::Error;

/// Errors raised while constructing or validating rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid trigger mode: {0}")]
    InvalidTriggerMode(String),
    #[error("invalid rate limit spec '{0}', expected N/SECONDS")]
    InvalidRateLimit(String),
    #[error("poll_interval must be positive, got {0}")]
    NonPositiveInterval(f64),
    #[error("timeout must be positive, got {0}")]
    NonPositiveTimeout(f64),
}
