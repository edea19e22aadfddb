//! The `rubricate reset` command.

use anyhow::{Context, Result};

use rubricate_core::session::clear_namespace;

use super::AppContext;
use crate::GlobalArgs;

pub fn execute(args: &GlobalArgs, confirmed: bool) -> Result<()> {
    let ctx = AppContext::load(args)?;
    if !confirmed {
        println!(
            "This deletes every stored evaluation for variant {}. Re-run with --yes to confirm.",
            ctx.criteria.variant
        );
        return Ok(());
    }
    let mut store = ctx.open_store()?;
    let removed = clear_namespace(&mut store, &ctx.criteria.variant)
        .context("failed to clear stored session")?;
    println!(
        "Removed {removed} stored entr{} for variant {}.",
        if removed == 1 { "y" } else { "ies" },
        ctx.criteria.variant
    );
    Ok(())
}
