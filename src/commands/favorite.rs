//! Toggle the favorite flag of a post

use anyhow::{bail, Result};

use crate::content::PostId;
use crate::Feed;

/// Run the favorite command
///
/// Document posts are refused, their flag only lives in a running server.
pub async fn run(feed: &Feed, id: &PostId) -> Result<()> {
    if !id.is_local() {
        bail!(
            "{} comes from {:?}; its favorite flag cannot be kept outside `postfeed serve`",
            id,
            feed.document_path
        );
    }

    let mut session = feed.open_session().await;
    if session.toggle_favorite(id)? {
        println!("Added to favorites: {}", id);
    } else {
        println!("Removed from favorites: {}", id);
    }
    Ok(())
}
