//! The `rubricate progress` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::AppContext;
use crate::GlobalArgs;

pub async fn execute(args: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(args)?;
    let (session, _) = ctx.open_session().await?;

    let Some(selection) = session.selection() else {
        println!(
            "No active selection. {} evaluation(s) stored for variant {}.",
            session.records().len(),
            ctx.criteria.variant
        );
        return Ok(());
    };

    let current = session.current_index();
    let mut table = Table::new();
    table.set_header(vec!["", "#", "ID", "Score", "Evaluated at"]);
    for (i, item) in session.items().iter().enumerate() {
        let marker = if Some(i) == current { ">" } else { "" };
        let (score, when) = match session.record(item.id()) {
            Some(r) => (
                format!("{}/{}", r.total_score, r.max_possible_score),
                r.evaluated_at.format("%Y-%m-%d %H:%M").to_string(),
            ),
            None => ("-".to_string(), String::new()),
        };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(i + 1),
            Cell::new(item.id()),
            Cell::new(score),
            Cell::new(when),
        ]);
    }
    println!("{table}");

    let progress = session.progress();
    println!(
        "{} / {}: evaluated {} of {} ({:.1}%)",
        selection.subject,
        selection.locale,
        progress.evaluated,
        progress.total,
        progress.percentage()
    );
    Ok(())
}
