// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli_args::RemoveArgs;
use crate::context::{CliContext, DEFAULT_POLL_INTERVAL_SECS};
use anyhow::{bail, Context, Result};
use kicker_core::RuleId;
use kicker_storage::RuleStore;

pub fn execute(ctx: &CliContext, args: RemoveArgs) -> Result<()> {
    let store = RuleStore::new(ctx.config_file.clone());
    let mut rules = store
        .load(DEFAULT_POLL_INTERVAL_SECS)
        .context("failed to load the rule store")?;

    let id = RuleId::new(args.id);
    if rules.remove(id).is_none() {
        bail!("no rule with id {id}");
    }

    store.save(&rules).context("failed to save the rule store")?;
    println!("removed rule {id}");
    Ok(())
}
