//! The `rubricate show` command.

use anyhow::Result;

use super::open_active_session;
use crate::display::{print_item, print_scorecard};
use crate::GlobalArgs;

pub async fn execute(args: &GlobalArgs) -> Result<()> {
    let (session, _) = open_active_session(args).await?;
    let Some(item) = session.current() else {
        anyhow::bail!("no active selection; run `rubricate start` first");
    };
    let index = session.current_index().unwrap_or_default();
    print_item(item, index, session.items().len(), session.record(item.id()));
    print_scorecard(&session.scorecard()?);
    if let Some(reasoning) = session
        .record(item.id())
        .and_then(|r| r.reasoning.as_deref())
    {
        println!("{}: {reasoning}", session.criteria().notes_label);
    }
    Ok(())
}
