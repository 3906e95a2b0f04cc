//! Render the feed page to a file

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::filter::MonthFilter;
use crate::helpers::feed_page;
use crate::Feed;

/// Run the render command; `None` prints to stdout
pub async fn run(feed: &Feed, filter: MonthFilter, output: Option<&Path>) -> Result<()> {
    let mut session = feed.open_session().await;
    session.select(filter);
    let html = feed_page(&session, &feed.config);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, html)?;
            tracing::info!("Wrote {:?}", path);
        }
        None => print!("{}", html),
    }
    Ok(())
}
