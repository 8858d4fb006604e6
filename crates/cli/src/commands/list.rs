// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli_args::ListArgs;
use crate::context::{CliContext, DEFAULT_POLL_INTERVAL_SECS};
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use kicker_storage::RuleStore;
use serde::Serialize;

#[derive(Serialize)]
struct RuleRow {
    id: u64,
    check_script: String,
    action_script: String,
    original_spec: String,
    poll_interval_secs: f64,
}

pub fn execute(ctx: &CliContext, args: ListArgs) -> Result<()> {
    let store = RuleStore::new(ctx.config_file.clone());
    let rules = store
        .load(DEFAULT_POLL_INTERVAL_SECS)
        .context("failed to load the rule store")?;

    let rows: Vec<RuleRow> = rules
        .rules
        .iter()
        .map(|r| RuleRow {
            id: r.id.0,
            check_script: r.check_script.display().to_string(),
            action_script: r.action_script.display().to_string(),
            original_spec: r.original_spec.clone(),
            poll_interval_secs: r.poll_interval_secs.unwrap_or(rules.default_poll_interval),
        })
        .collect();

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("no rules");
            }
            for row in &rows {
                println!(
                    "{}\t{}\t{}\t{}\t{}s",
                    row.id, row.check_script, row.action_script, row.original_spec, row.poll_interval_secs
                );
            }
        }
    }

    Ok(())
}
