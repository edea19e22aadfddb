//! The `rubricate criteria` command.

use anyhow::Result;

use rubricate_core::criteria::{Applicability, CriteriaSet, Criterion};
use rubricate_sources::config::create_source;
use rubricate_sources::fetch_criteria_doc;

use super::AppContext;
use crate::GlobalArgs;

pub async fn execute(args: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(args)?;
    if let Some(location) = &ctx.config.criteria_doc {
        let source = create_source(location)?;
        if let Some(doc) = fetch_criteria_doc(source.as_ref()).await {
            println!("{doc}");
            return Ok(());
        }
    }
    print_builtin(&ctx.criteria);
    Ok(())
}

fn print_builtin(criteria: &CriteriaSet) {
    println!(
        "Criteria for variant {} (maximum score {})",
        criteria.variant, criteria.max_score
    );
    if !criteria.gates.is_empty() {
        println!("\nAny FAIL below sets the total to 0.");
    }

    for criterion in criteria.form_order() {
        match criterion {
            Criterion::Gate(g) => {
                println!("\n{} ({}) PASS/FAIL", g.label, g.key);
                if !g.description.is_empty() {
                    println!("  {}", g.description);
                }
            }
            Criterion::Quality(q) => {
                let scope = match q.applies_to {
                    Applicability::All => "",
                    Applicability::Mcq => ", MCQ only",
                    Applicability::OpenEnded => ", open-ended only",
                };
                let group = q
                    .group
                    .as_deref()
                    .map(|g| format!("{g}: "))
                    .unwrap_or_default();
                println!(
                    "\n{group}{} ({}) {}-{}{scope}",
                    q.label, q.key, q.min, q.max
                );
                if !q.description.is_empty() {
                    println!("  {}", q.description);
                }
                for (score, level) in (q.min..).zip(&q.levels) {
                    println!("    {score}: {level}");
                }
            }
        }
    }
}
