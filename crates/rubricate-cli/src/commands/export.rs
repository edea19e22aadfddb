//! The `rubricate export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use rubricate_core::session::{load_records, StoreKeys};
use rubricate_core::traits::KeyValueStore;
use rubricate_report::{write_export, ExportFormat};

use super::AppContext;
use crate::GlobalArgs;

pub fn execute(
    args: &GlobalArgs,
    format: Option<String>,
    output: Option<PathBuf>,
    evaluator: Option<String>,
) -> Result<()> {
    let ctx = AppContext::load(args)?;
    let store = ctx.open_store()?;
    let records = load_records(&store, &ctx.criteria).context("failed to read stored evaluations")?;

    let format = match format {
        Some(f) => f.parse::<ExportFormat>().map_err(anyhow::Error::msg)?,
        None => ExportFormat::default_for(&ctx.criteria),
    };
    let evaluator = evaluator.or_else(|| {
        store
            .get(&StoreKeys::new(&ctx.criteria.variant).evaluator())
            .ok()
            .flatten()
    });
    let dir = output.unwrap_or_else(|| ctx.config.export_dir.clone());

    let path = write_export(
        &records,
        &ctx.criteria,
        format,
        &dir,
        evaluator.as_deref(),
        chrono::Local::now().date_naive(),
    )?;
    println!(
        "Exported {} evaluation(s) to {}",
        records.len(),
        path.display()
    );
    Ok(())
}
