//! Durable storage of the user's own posts
//!
//! Posts are kept as one JSON array under a single key of a small key/value
//! store, mirroring how a browser keeps them in local storage.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use super::{PostId, PostRecord};
use crate::error::Result;

/// Default key holding the post list
pub const DEFAULT_KEY: &str = "posts";

/// String key/value storage
pub trait Storage {
    /// Read the value under `key`, `None` if absent or unreadable
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<IndexMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by one JSON object file
///
/// The whole file is read on every access and replaced on every change. A
/// missing or corrupt file reads as an empty store.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_items(&self) -> IndexMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return IndexMap::new();
        };
        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Ignoring corrupt storage file {:?}: {}", self.path, e);
                IndexMap::new()
            }
        }
    }

    fn write_items(&self, items: &IndexMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(items)?;

        // Replace the file whole through a sibling temp file
        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.read_items().shift_remove(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.read_items();
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }
}

/// The user's posts, persisted under one storage key
#[derive(Debug)]
pub struct LocalPostStore<S> {
    storage: S,
    key: String,
}

impl<S: Storage> LocalPostStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load every stored post
    ///
    /// Absent, empty or malformed data all read as an empty list.
    pub fn load_all(&self) -> Vec<PostRecord> {
        let Some(raw) = self.storage.get_item(&self.key) else {
            return Vec::new();
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Vec<PostRecord>>(&raw) {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Stored posts under '{}' are invalid, ignoring: {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Append one post and write the whole list back
    pub fn append(&self, post: PostRecord) -> Result<()> {
        let mut posts = self.load_all();
        posts.push(post);
        self.save_all(&posts)
    }

    /// Remove a post; returns whether it was stored
    pub fn remove(&self, id: &PostId) -> Result<bool> {
        let mut posts = self.load_all();
        let before = posts.len();
        posts.retain(|p| &p.id != id);
        if posts.len() == before {
            return Ok(false);
        }
        self.save_all(&posts)?;
        Ok(true)
    }

    /// Persist the favorite flag of a post; returns whether it was stored
    pub fn set_favorite(&self, id: &PostId, favorite: bool) -> Result<bool> {
        let mut posts = self.load_all();
        let Some(post) = posts.iter_mut().find(|p| &p.id == id) else {
            return Ok(false);
        };
        post.favorites = favorite;
        self.save_all(&posts)?;
        Ok(true)
    }

    /// Id for a post created at `now`
    ///
    /// Normally the creation time in milliseconds; bumped past the largest
    /// stored id when that millisecond is already taken.
    pub fn next_id(&self, now: &DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let max_stored = self
            .load_all()
            .iter()
            .filter_map(|p| match p.id {
                PostId::Local(id) => Some(id),
                PostId::Markdown(_) => None,
            })
            .max();

        match max_stored {
            Some(max) if max >= candidate => max + 1,
            _ => candidate,
        }
    }

    fn save_all(&self, posts: &[PostRecord]) -> Result<()> {
        let raw = serde_json::to_string(posts)?;
        self.storage.set_item(&self.key, &raw)
    }
}
