// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kicker` — rule editor and lifecycle control for the kicker automation
//! daemon. See [`kicker_daemon`] for the daemon itself (`kickerd`).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod cli_args;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli_args::{Cli, Command};
use context::CliContext;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // `run` launches a fresh `kickerd`, which resolves its own context from
    // the same environment — it doesn't need ours.
    let result = match cli.command {
        Command::Run(args) => commands::run::execute(args),
        other => CliContext::load().and_then(|ctx| dispatch(&ctx, other)),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("kicker: {}", format_error(&e));
            std::process::ExitCode::FAILURE
        }
    }
}

fn dispatch(ctx: &CliContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Add(args) => commands::add::execute(ctx, args),
        Command::List(args) => commands::list::execute(ctx, args),
        Command::Remove(args) => commands::remove::execute(ctx, args),
        Command::Stats(args) => commands::stats::execute(ctx, args),
        Command::Stop(args) => commands::stop::execute(ctx, args),
        Command::Run(_) => unreachable!("handled in main"),
    }
}

/// Join an `anyhow` error's context chain with `: `, the way the teacher's
/// CLI renders errors for a one-line, non-backtrace-cluttered message.
fn format_error(e: &anyhow::Error) -> String {
    e.chain().map(|c| c.to_string()).collect::<Vec<_>>().join(": ")
}
