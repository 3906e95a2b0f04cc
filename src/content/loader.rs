//! Feed loader - gathers posts from the local store and the markdown document

use indexmap::IndexMap;
use std::path::Path;

use super::store::{LocalPostStore, Storage};
use super::{FrontmatterParser, PostId, PostRecord};

/// Merge local and markdown posts into one feed
///
/// Duplicate ids resolve to the last occurrence (markdown after local). The
/// result is sorted oldest first; renderers prepend each post, so the screen
/// shows newest first. Keep both halves of this contract together.
pub fn assemble(local: Vec<PostRecord>, markdown: Vec<PostRecord>) -> Vec<PostRecord> {
    let mut by_id: IndexMap<PostId, PostRecord> = IndexMap::new();
    for post in local.into_iter().chain(markdown) {
        by_id.insert(post.id.clone(), post);
    }

    let mut posts: Vec<PostRecord> = by_id.into_values().collect();
    posts.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    posts
}

/// Read and parse the markdown document
///
/// An unreadable document contributes no posts; startup carries on without it.
pub async fn load_document(path: &Path, parser: &FrontmatterParser) -> Vec<PostRecord> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            let posts = parser.parse(&content);
            tracing::debug!("Parsed {} posts from {:?}", posts.len(), path);
            posts
        }
        Err(e) => {
            tracing::warn!("Failed to read feed document {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Load both sources, then assemble
///
/// Nothing is returned until the document read has finished, so callers
/// always render the fully merged feed.
pub async fn load_feed<S: Storage>(
    store: &LocalPostStore<S>,
    document: &Path,
    parser: &FrontmatterParser,
) -> Vec<PostRecord> {
    let local = store.load_all();
    let markdown = load_document(document, parser).await;
    tracing::info!(
        "Loaded {} local posts and {} document posts",
        local.len(),
        markdown.len()
    );
    assemble(local, markdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::store::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn record(id: PostId, secs: i64, content: &str) -> PostRecord {
        let mut post = PostRecord::local(
            0,
            content.to_string(),
            "Moi".to_string(),
            Utc.timestamp_opt(secs, 0).unwrap(),
        );
        post.id = id;
        post
    }

    #[test]
    fn test_last_occurrence_wins_and_sorts_ascending() {
        let a = record(PostId::Local(1), 10, "A");
        let b = record(PostId::Local(2), 5, "B");
        let c = record(PostId::Local(2), 5, "X");

        let feed = assemble(vec![a.clone(), b], vec![c.clone()]);
        assert_eq!(feed, vec![c, a]);
        assert_eq!(feed[0].content, "X");
    }

    #[test]
    fn test_assemble_orders_across_sources() {
        let local = vec![record(PostId::Local(3), 30, "new")];
        let markdown = vec![
            record(PostId::Markdown("md-2".into()), 20, "mid"),
            record(PostId::Markdown("md-1".into()), 10, "old"),
        ];
        let contents: Vec<_> = assemble(local, markdown)
            .into_iter()
            .map(|p| p.content)
            .collect();
        assert_eq!(contents, vec!["old", "mid", "new"]);
    }

    #[test]
    fn test_assemble_empty() {
        assert!(assemble(Vec::new(), Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn test_missing_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let parser = FrontmatterParser::new("Anonymous");
        let posts = load_document(&dir.path().join("missing.md"), &parser).await;
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_load_feed_merges_sources() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("posts.md");
        std::fs::write(&doc, "date: 2020-01-01\n---\nfrom the document\n").unwrap();

        let store = LocalPostStore::new(MemoryStorage::new());
        store
            .append(record(PostId::Local(1), 1_700_000_000, "mine"))
            .unwrap();

        let parser = FrontmatterParser::new("Anonymous");
        let feed = load_feed(&store, &doc, &parser).await;
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].content, "from the document");
        assert_eq!(feed[1].content, "mine");
    }
}
