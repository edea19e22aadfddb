//! The `rubricate score` command: preview without saving.

use anyhow::Result;

use super::{apply_inputs, open_active_session};
use crate::display::print_scorecard;
use crate::GlobalArgs;

pub async fn execute(
    args: &GlobalArgs,
    assignments: Vec<(String, String)>,
    keys: Option<String>,
) -> Result<()> {
    let (session, _) = open_active_session(args).await?;
    let mut card = session.scorecard()?;
    apply_inputs(&mut card, &assignments, keys.as_deref())?;
    print_scorecard(&card);
    Ok(())
}
