//! Publish a new local post

use anyhow::Result;

use crate::Feed;

/// Run the post command
pub async fn run(feed: &Feed, content: &str) -> Result<()> {
    let mut session = feed.open_session().await;
    let post = session.submit(content, &feed.config.author, chrono::Utc::now(), &mut ())?;
    println!("Posted: {}", post.id);
    Ok(())
}
