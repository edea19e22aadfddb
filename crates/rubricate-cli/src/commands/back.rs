//! The `rubricate back` command.

use anyhow::Result;

use super::AppContext;
use crate::GlobalArgs;

pub async fn execute(args: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(args)?;
    let (mut session, _) = ctx.open_session().await?;
    if !session.is_active() {
        println!("Already at the selection step.");
        return Ok(());
    }
    session.back_to_selection();
    println!(
        "Returned to selection. {} evaluation(s) kept.",
        session.records().len()
    );
    Ok(())
}
