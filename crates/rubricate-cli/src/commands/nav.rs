//! The `rubricate next`, `prev` and `goto` commands.

use anyhow::Result;

use rubricate_core::session::Session;
use rubricate_core::store::FileStore;

use super::open_active_session;
use crate::display::print_item;
use crate::GlobalArgs;

pub async fn next(args: &GlobalArgs) -> Result<()> {
    let (mut session, _) = open_active_session(args).await?;
    if !session.next()? {
        println!("Already at the last item.");
    }
    print_current(&session);
    Ok(())
}

pub async fn prev(args: &GlobalArgs) -> Result<()> {
    let (mut session, _) = open_active_session(args).await?;
    if !session.prev()? {
        println!("Already at the first item.");
    }
    print_current(&session);
    Ok(())
}

pub async fn goto(args: &GlobalArgs, position: usize) -> Result<()> {
    let (mut session, _) = open_active_session(args).await?;
    session.jump_to(position)?;
    print_current(&session);
    Ok(())
}

fn print_current(session: &Session<FileStore>) {
    if !session.is_durable() {
        eprintln!("Warning: the new position could not be saved.");
    }
    if let (Some(item), Some(index)) = (session.current(), session.current_index()) {
        print_item(item, index, session.items().len(), session.record(item.id()));
    }
}
