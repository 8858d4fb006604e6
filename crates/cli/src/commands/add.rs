// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli_args::AddArgs;
use crate::context::{CliContext, DEFAULT_POLL_INTERVAL_SECS};
use anyhow::{bail, Context, Result};
use kicker_core::{RateLimit, Rule, RuleSet, TriggerMode};
use kicker_storage::RuleStore;

fn trigger_from_args(args: &AddArgs) -> Result<TriggerMode> {
    let mut selected = vec![];
    if args.if_zero {
        selected.push(TriggerMode::OnZero);
    }
    if args.if_nonzero {
        selected.push(TriggerMode::OnNonzero);
    }
    if args.if_fail_to_pass {
        selected.push(TriggerMode::OnTransitionFailToPass);
    }
    if args.if_pass_to_fail {
        selected.push(TriggerMode::OnTransitionPassToFail);
    }
    if let Some(n) = args.if_code {
        selected.push(TriggerMode::OnCodeN(n));
    }

    match selected.len() {
        0 => bail!("exactly one trigger flag is required (--if-zero, --if-nonzero, --if-fail-to-pass, --if-pass-to-fail, or --if-code)"),
        1 => Ok(selected.remove(0)),
        _ => bail!("only one trigger flag may be given at a time"),
    }
}

pub fn execute(ctx: &CliContext, args: AddArgs) -> Result<()> {
    let trigger = trigger_from_args(&args)?;
    let rate_limit = args
        .rate
        .as_deref()
        .map(RateLimit::parse)
        .transpose()
        .context("invalid --rate value, expected N/SECONDS (e.g. 2/5)")?;

    let store = RuleStore::new(ctx.config_file.clone());
    let mut rules = store
        .load(DEFAULT_POLL_INTERVAL_SECS)
        .context("failed to load the rule store")?;

    let id = rules.allocate_id();
    let rule = Rule {
        id,
        check_script: args.check_script,
        action_script: args.action_script,
        trigger,
        poll_interval_secs: args.every,
        rate_limit,
        timeout_secs: args.timeout,
        once: args.once,
        original_spec: trigger.describe(),
    };

    rules.rules.push(rule);
    persist(&store, &rules)?;

    println!("added rule {id}");
    Ok(())
}

fn persist(store: &RuleStore, rules: &RuleSet) -> Result<()> {
    store.save(rules).context("failed to save the rule store")
}
