// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output format shared by every read-only subcommand (`list`, `stats`).
//! Kept deliberately unornamented: no color, no interactive tables — see
//! SPEC_FULL.md's Non-goals for this CLI surface.

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
