//! The `rubricate subjects` command.

use std::collections::BTreeMap;

use anyhow::Result;
use comfy_table::{Cell, Table};

use rubricate_core::present::format_locale;

use super::AppContext;
use crate::GlobalArgs;

pub async fn execute(args: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(args)?;
    let dataset = ctx.load_usable_dataset().await?;

    // subject -> locale -> count
    let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for item in &dataset.items {
        let subject = item.discipline().trim();
        if subject.is_empty() {
            continue;
        }
        *counts
            .entry(subject)
            .or_default()
            .entry(item.locale())
            .or_default() += 1;
    }

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Items", "Locales"]);
    for (subject, locales) in &counts {
        let total: usize = locales.values().sum();
        let breakdown = locales
            .iter()
            .map(|(locale, n)| format!("{} ({n})", format_locale(locale)))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![Cell::new(subject), Cell::new(total), Cell::new(breakdown)]);
    }
    println!("{table}");
    println!("{} item(s) in {} subject(s).", dataset.len(), counts.len());
    Ok(())
}
