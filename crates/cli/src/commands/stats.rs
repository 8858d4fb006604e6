// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli_args::StatsArgs;
use crate::context::{CliContext, DEFAULT_POLL_INTERVAL_SECS};
use crate::output::OutputFormat;
use anyhow::{bail, Context, Result};
use kicker_core::{paths, RuleId};
use kicker_storage::{RuleStore, StatsStore};
use serde::Serialize;

#[derive(Serialize)]
struct StatsRow {
    id: u64,
    checks: u64,
    actions: u64,
    actions_last_24h: u64,
}

pub fn execute(ctx: &CliContext, args: StatsArgs) -> Result<()> {
    let rule_store = RuleStore::new(ctx.config_file.clone());
    let rules = rule_store
        .load(DEFAULT_POLL_INTERVAL_SECS)
        .context("failed to load the rule store")?;

    let stats_store = StatsStore::new(paths::stats_file(&ctx.state_dir));
    let stats = stats_store.load().context("failed to load the stats sidecar")?;

    let ids: Vec<RuleId> = match args.id {
        Some(id) => {
            let id = RuleId::new(id);
            if rules.find(id).is_none() {
                bail!("no rule with id {id}");
            }
            vec![id]
        }
        None => rules.rules.iter().map(|r| r.id).collect(),
    };

    let rows: Vec<StatsRow> = ids
        .into_iter()
        .map(|id| {
            let s = stats.get(&id).copied().unwrap_or_default();
            StatsRow {
                id: id.0,
                checks: s.checks,
                actions: s.actions,
                actions_last_24h: s.actions_last_24h,
            }
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
                    "{}\tchecks={}\tactions={}\tactions_last_24h={}",
                    row.id, row.checks, row.actions, row.actions_last_24h
                );
            }
        }
    }

    Ok(())
}
