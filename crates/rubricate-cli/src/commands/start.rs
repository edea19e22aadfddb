//! The `rubricate start` command.

use anyhow::{Context, Result};

use rubricate_core::selection::{LocaleFilter, SubjectFilter};

use super::AppContext;
use crate::display::{print_item, print_scorecard};
use crate::GlobalArgs;

pub async fn execute(
    args: &GlobalArgs,
    subject: String,
    locale: String,
    evaluator: Option<String>,
) -> Result<()> {
    let subject: SubjectFilter = subject
        .parse()
        .map_err(anyhow::Error::msg)
        .context("invalid --subject")?;
    let locale: LocaleFilter = locale
        .parse()
        .map_err(anyhow::Error::msg)
        .context("invalid --locale")?;

    let ctx = AppContext::load(args)?;
    let (mut session, dataset) = ctx.open_session().await?;
    let count = session.start(&dataset, subject, locale, evaluator)?;
    if !session.is_durable() {
        eprintln!("Warning: the selection could not be saved; it will not survive this command.");
    }

    let evaluator = session
        .selection()
        .and_then(|s| s.evaluator.clone())
        .unwrap_or_else(|| "anonymous".to_string());
    println!("Evaluating {count} item(s) as {evaluator}.\n");

    if let Some(item) = session.current() {
        print_item(item, 0, count, session.record(item.id()));
        print_scorecard(&session.scorecard()?);
    }
    Ok(())
}
