//! List feed content

use anyhow::Result;

use crate::content::PostRecord;
use crate::filter::MonthFilter;
use crate::helpers::post_time;
use crate::Feed;

/// List the feed, newest first
pub async fn run(feed: &Feed, filter: MonthFilter, favorites_only: bool) -> Result<()> {
    let mut session = feed.open_session().await;
    session.select(filter);

    let favorites: Vec<_> = session.favorites().collect();
    if !favorites.is_empty() {
        println!("Favorites ({}):", favorites.len());
        for post in favorites {
            print_post(post);
        }
    }

    if !favorites_only {
        let posts: Vec<_> = session.feed().collect();
        println!("Feed ({}, {}):", session.active_filter(), posts.len());
        for post in posts {
            print_post(post);
        }
    }

    Ok(())
}

/// List the known months
pub async fn months(feed: &Feed) -> Result<()> {
    let session = feed.open_session().await;
    println!("Months ({}):", session.filter().len());
    for (key, label) in session.filter().months() {
        println!("  {} - {}", key, label);
    }
    Ok(())
}

fn print_post(post: &PostRecord) {
    println!(
        "  [{}] {} - {}: {}",
        post.id,
        post_time(&post.timestamp),
        post.author,
        post.content.replace('\n', " ")
    );
}
