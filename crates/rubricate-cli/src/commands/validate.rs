//! The `rubricate validate` command.

use anyhow::{Context, Result};

use rubricate_core::selection::subjects;
use rubricate_sources::config::create_source;
use rubricate_sources::load_inputs;

use super::AppContext;
use crate::GlobalArgs;

pub async fn execute(args: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(args)?;
    let location = ctx.dataset_location()?;
    let dataset_source = create_source(location)?;
    let doc_source = match &ctx.config.criteria_doc {
        Some(doc) => Some(create_source(doc)?),
        None => None,
    };

    let inputs = load_inputs(dataset_source.as_ref(), doc_source.as_deref()).await;
    let adapted = inputs
        .dataset
        .with_context(|| format!("failed to load dataset {location}"))?;

    println!("Dataset: {location}");
    println!(
        "  {} item(s) ({})",
        adapted.dataset.len(),
        adapted.dataset.shape
    );
    let subject_list = subjects(&adapted.dataset.items);
    if !subject_list.is_empty() {
        println!("  Subjects: {}", subject_list.join(", "));
    }
    println!(
        "Criteria: {} (max {})",
        ctx.criteria.variant, ctx.criteria.max_score
    );
    if ctx.config.criteria_doc.is_some() {
        match inputs.criteria_doc {
            Some(_) => println!("Criteria document: reachable"),
            None => println!("Criteria document: unavailable, using built-in descriptions"),
        }
    }

    for w in &adapted.warnings {
        let prefix = w
            .subject_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if adapted.is_empty() {
        anyhow::bail!("dataset {location} contains no usable items");
    }
    if adapted.warnings.is_empty() {
        println!("Dataset valid.");
    } else {
        println!("\n{} warning(s) found.", adapted.warnings.len());
    }
    Ok(())
}
