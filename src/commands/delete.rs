//! Delete a local post

use anyhow::Result;
use inquire::Confirm;

use crate::content::PostId;
use crate::Feed;

/// Ask on the terminal; anything but an explicit yes cancels
fn ask(prompt: &str) -> bool {
    Confirm::new(prompt)
        .with_default(false)
        .with_help_message("Press 'y' to delete, Enter to cancel")
        .prompt()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read confirmation: {}", e);
            false
        })
}

/// Run the delete command
pub async fn run(feed: &Feed, id: &PostId, yes: bool) -> Result<()> {
    let mut session = feed.open_session().await;

    let deleted = if yes {
        session.delete(id, &mut |_: &str| true, &mut ())?
    } else {
        session.delete(id, &mut ask, &mut ())?
    };

    if deleted {
        println!("Deleted: {}", id);
    } else {
        println!("Cancelled.");
    }
    Ok(())
}
