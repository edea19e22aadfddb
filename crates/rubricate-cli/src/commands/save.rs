//! The `rubricate save` command.

use anyhow::Result;

use super::{apply_inputs, open_active_session};
use crate::display::{print_item, print_total};
use crate::GlobalArgs;

pub async fn execute(
    args: &GlobalArgs,
    assignments: Vec<(String, String)>,
    keys: Option<String>,
    reasoning: Option<String>,
) -> Result<()> {
    let (mut session, _) = open_active_session(args).await?;
    let mut card = session.scorecard()?;
    apply_inputs(&mut card, &assignments, keys.as_deref())?;

    // keep earlier notes unless new ones are given
    let reasoning = reasoning.or_else(|| {
        session
            .current()
            .and_then(|item| session.record(item.id()))
            .and_then(|r| r.reasoning.clone())
    });

    let outcome = session.save(&card, reasoning)?;
    println!(
        "Saved {}: {}/{}",
        outcome.record.subject_id, outcome.record.total_score, outcome.record.max_possible_score
    );
    print_total(&card);
    if !session.is_durable() {
        eprintln!("Warning: this evaluation could not be written to durable storage.");
    }

    if outcome.advanced {
        if let (Some(item), Some(index)) = (session.current(), session.current_index()) {
            println!();
            print_item(item, index, session.items().len(), session.record(item.id()));
        }
    } else {
        let progress = session.progress();
        println!(
            "That was the last item ({}/{} evaluated).",
            progress.evaluated, progress.total
        );
    }
    Ok(())
}
