//! Feed session - the state behind one user's feed view
//!
//! Holds the assembled posts, the month filter and the store, and applies
//! user actions to all three together.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::content::{LocalPostStore, PostId, PostRecord, Storage};
use crate::error::{FeedError, Result};
use crate::filter::{FilterIndex, MonthFilter};

/// Prompt shown before deleting a post
pub const DELETE_PROMPT: &str = "Do you really want to delete this post?";

/// Presentation layer fed by the session
///
/// Posts are handed over oldest first and each one is expected to go to the
/// front of the visual list.
pub trait Renderer {
    /// Show one post at the front of its list
    fn render_post(&mut self, post: &PostRecord);

    /// Drop the visual element of a post
    fn remove_post(&mut self, id: &PostId);
}

/// Renders nothing
impl Renderer for () {
    fn render_post(&mut self, _post: &PostRecord) {}

    fn remove_post(&mut self, _id: &PostId) {}
}

/// Asks the user before a destructive action
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// State of one feed view
#[derive(Debug)]
pub struct FeedSession<S> {
    store: LocalPostStore<S>,
    /// Oldest first
    posts: Vec<PostRecord>,
    filter: FilterIndex,
}

impl<S: Storage> FeedSession<S> {
    /// Start a session over an already assembled feed
    pub fn new(store: LocalPostStore<S>, posts: Vec<PostRecord>) -> Self {
        let mut filter = FilterIndex::new();
        for post in &posts {
            filter.register_post(post);
        }
        Self {
            store,
            posts,
            filter,
        }
    }

    pub fn store(&self) -> &LocalPostStore<S> {
        &self.store
    }

    /// All posts, oldest first
    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    pub fn get(&self, id: &PostId) -> Option<&PostRecord> {
        self.posts.iter().find(|p| &p.id == id)
    }

    /// Publish a new local post
    pub fn submit<R: Renderer>(
        &mut self,
        content: &str,
        author: &str,
        now: DateTime<Utc>,
        renderer: &mut R,
    ) -> Result<PostRecord> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FeedError::EmptyPost);
        }

        let id = self.store.next_id(&now);
        let post = PostRecord::local(id, content.to_string(), author.to_string(), now);
        self.store.append(post.clone())?;
        self.filter.register_post(&post);

        let at = self
            .posts
            .partition_point(|p| p.timestamp <= post.timestamp);
        self.posts.insert(at, post.clone());
        renderer.render_post(&post);

        tracing::info!("Published post {}", post.id);
        Ok(post)
    }

    /// Delete a local post once the user confirms
    ///
    /// Returns `Ok(false)` when the user declines.
    pub fn delete<C: Confirm, R: Renderer>(
        &mut self,
        id: &PostId,
        confirm: &mut C,
        renderer: &mut R,
    ) -> Result<bool> {
        let post = self
            .get(id)
            .ok_or_else(|| FeedError::PostNotFound(id.clone()))?;
        if !post.is_local() {
            return Err(FeedError::ReadOnlyPost(id.clone()));
        }

        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!("Deletion of {} cancelled", id);
            return Ok(false);
        }

        self.store.remove(id)?;
        self.posts.retain(|p| &p.id != id);
        renderer.remove_post(id);

        tracing::info!("Deleted post {}", id);
        Ok(true)
    }

    /// Flip the favorite flag; returns the new value
    ///
    /// Persisted for local posts, kept for this session only otherwise.
    pub fn toggle_favorite(&mut self, id: &PostId) -> Result<bool> {
        let post = self
            .get(id)
            .ok_or_else(|| FeedError::PostNotFound(id.clone()))?;
        let favorite = !post.favorites;

        if post.is_local() {
            self.store.set_favorite(id, favorite)?;
        }
        if let Some(post) = self.posts.iter_mut().find(|p| &p.id == id) {
            post.favorites = favorite;
        }
        Ok(favorite)
    }

    /// Swap in a freshly assembled feed
    ///
    /// The active filter and session-only favorites of document posts carry
    /// over; the month index is rebuilt from the new posts.
    pub fn reload(&mut self, mut posts: Vec<PostRecord>) {
        let kept: HashSet<&PostId> = self
            .posts
            .iter()
            .filter(|p| !p.is_local() && p.favorites)
            .map(|p| &p.id)
            .collect();

        let mut filter = FilterIndex::new();
        for post in &mut posts {
            if !post.is_local() && kept.contains(&post.id) {
                post.favorites = true;
            }
            filter.register_post(post);
        }
        filter.select(self.filter.active().clone());

        self.posts = posts;
        self.filter = filter;
    }

    pub fn filter(&self) -> &FilterIndex {
        &self.filter
    }

    pub fn active_filter(&self) -> &MonthFilter {
        self.filter.active()
    }

    pub fn select(&mut self, filter: MonthFilter) {
        self.filter.select(filter);
    }

    /// Visible posts outside favorites, newest first
    pub fn feed(&self) -> impl Iterator<Item = &PostRecord> {
        self.visible().filter(|p| !p.favorites)
    }

    /// Visible favorites, newest first
    pub fn favorites(&self) -> impl Iterator<Item = &PostRecord> {
        self.visible().filter(|p| p.favorites)
    }

    fn visible(&self) -> impl Iterator<Item = &PostRecord> {
        self.posts.iter().rev().filter(|p| self.filter.shows(p))
    }

    /// Replay every visible post into `renderer`, oldest first
    pub fn render<R: Renderer>(&self, renderer: &mut R) {
        for post in self.posts.iter().filter(|p| self.filter.shows(p)) {
            renderer.render_post(post);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MemoryStorage, PostSource};
    use chrono::TimeZone;
    use std::cell::Cell;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
    }

    fn markdown_post() -> PostRecord {
        PostRecord::markdown("from doc".to_string(), "Anonymous".to_string(), at(2024, 1, 10))
    }

    fn session() -> FeedSession<MemoryStorage> {
        let store = LocalPostStore::new(MemoryStorage::new());
        FeedSession::new(store, vec![markdown_post()])
    }

    /// Records the order of renderer calls
    #[derive(Default)]
    struct Recorder {
        shown: Vec<PostId>,
        removed: Vec<PostId>,
    }

    impl Renderer for Recorder {
        fn render_post(&mut self, post: &PostRecord) {
            self.shown.push(post.id.clone());
        }

        fn remove_post(&mut self, id: &PostId) {
            self.removed.push(id.clone());
        }
    }

    #[test]
    fn test_submit_persists_and_registers_month() {
        let mut session = session();
        let mut recorder = Recorder::default();
        let post = session
            .submit("  hello  ", "Moi", at(2024, 2, 3), &mut recorder)
            .unwrap();

        assert_eq!(post.content, "hello");
        assert_eq!(post.source, PostSource::Local);
        assert_eq!(session.store().load_all(), vec![post.clone()]);
        assert!(session.filter().contains("2024-02"));
        assert_eq!(recorder.shown, vec![post.id.clone()]);
        assert_eq!(session.feed().next().map(|p| &p.id), Some(&post.id));
    }

    #[test]
    fn test_submit_rejects_empty() {
        let mut session = session();
        let err = session.submit("   ", "Moi", at(2024, 2, 3), &mut ()).unwrap_err();
        assert!(matches!(err, FeedError::EmptyPost));
        assert!(session.store().load_all().is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut session = session();
        let post = session.submit("bye", "Moi", at(2024, 2, 3), &mut ()).unwrap();
        let mut recorder = Recorder::default();

        let removed = session
            .delete(&post.id, &mut |_: &str| false, &mut recorder)
            .unwrap();
        assert!(!removed);
        assert_eq!(session.posts().len(), 2);

        let removed = session
            .delete(&post.id, &mut |_: &str| true, &mut recorder)
            .unwrap();
        assert!(removed);
        assert_eq!(session.posts().len(), 1);
        assert!(session.store().load_all().is_empty());
        assert_eq!(recorder.removed, vec![post.id]);
    }

    #[test]
    fn test_markdown_posts_are_read_only() {
        let mut session = session();
        let id = markdown_post().id;
        let mut asked = false;
        let mut confirm = |_: &str| {
            asked = true;
            true
        };
        let err = session.delete(&id, &mut confirm, &mut ()).unwrap_err();
        assert!(matches!(err, FeedError::ReadOnlyPost(_)));
        assert!(!asked);

        let missing = session.delete(&PostId::Local(1), &mut |_: &str| true, &mut ());
        assert!(matches!(missing, Err(FeedError::PostNotFound(_))));
    }

    #[test]
    fn test_toggle_favorite() {
        let mut session = session();
        let post = session.submit("fav", "Moi", at(2024, 2, 3), &mut ()).unwrap();

        assert!(session.toggle_favorite(&post.id).unwrap());
        assert!(session.store().load_all()[0].favorites);
        assert_eq!(session.favorites().count(), 1);
        assert_eq!(session.feed().count(), 1);

        // markdown favorites live in the session only
        let md = markdown_post().id;
        assert!(session.toggle_favorite(&md).unwrap());
        assert_eq!(session.favorites().count(), 2);
        assert_eq!(session.store().load_all().len(), 1);

        assert!(!session.toggle_favorite(&post.id).unwrap());
        assert!(!session.store().load_all()[0].favorites);
    }

    /// Storage that refuses writes once `read_only` is set
    #[derive(Default)]
    struct LockableStorage {
        inner: MemoryStorage,
        read_only: Cell<bool>,
    }

    impl Storage for LockableStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if self.read_only.get() {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.inner.set_item(key, value)
        }
    }

    #[test]
    fn test_failed_favorite_write_leaves_post_unchanged() {
        let store = LocalPostStore::new(LockableStorage::default());
        let mut session = FeedSession::new(store, Vec::new());
        let post = session.submit("keep", "Moi", at(2024, 2, 3), &mut ()).unwrap();

        session.store().storage().read_only.set(true);
        assert!(session.toggle_favorite(&post.id).is_err());
        assert!(!session.get(&post.id).unwrap().favorites);
        assert!(!session.store().load_all()[0].favorites);
        assert_eq!(session.favorites().count(), 0);
    }

    #[test]
    fn test_reload_picks_up_new_posts() {
        let mut session = session();
        session.select("2024-01".parse().unwrap());
        let md = markdown_post();
        session.toggle_favorite(&md.id).unwrap();

        let added = PostRecord::markdown("added".to_string(), "A".to_string(), at(2024, 3, 1));
        session.reload(vec![md.clone(), added]);

        assert_eq!(session.posts().len(), 2);
        assert!(session.filter().contains("2024-03"));
        assert_eq!(session.active_filter().to_string(), "2024-01");
        assert!(session.get(&md.id).unwrap().favorites);
        assert_eq!(session.favorites().count(), 1);
    }

    #[test]
    fn test_reload_drops_removed_months() {
        let mut session = session();
        session.reload(Vec::new());
        assert!(session.posts().is_empty());
        assert!(session.filter().is_empty());
    }

    #[test]
    fn test_filter_and_render_order() {
        let mut session = session();
        session.submit("feb", "Moi", at(2024, 2, 3), &mut ()).unwrap();
        session.submit("jan", "Moi", at(2024, 1, 20), &mut ()).unwrap();

        let newest_first: Vec<_> = session.feed().map(|p| p.content.as_str()).collect();
        assert_eq!(newest_first, vec!["feb", "jan", "from doc"]);

        let mut recorder = Recorder::default();
        session.render(&mut recorder);
        let rendered: Vec<_> = recorder
            .shown
            .iter()
            .map(|id| session.get(id).unwrap().content.as_str())
            .collect();
        assert_eq!(rendered, vec!["from doc", "jan", "feb"]);

        session.select("2024-01".parse().unwrap());
        let january: Vec<_> = session.feed().map(|p| p.content.as_str()).collect();
        assert_eq!(january, vec!["jan", "from doc"]);

        session.select(MonthFilter::All);
        assert_eq!(session.feed().count(), 3);
    }
}
