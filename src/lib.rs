//! postfeed: a small social feed
//!
//! Posts written locally are kept in a key/value storage file; read-only
//! posts come from a static markdown document whose blocks are separated by
//! `---`. Both are merged into one chronological feed that can be filtered
//! by month, rendered as HTML, or served locally.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod filter;
pub mod helpers;
pub mod server;
pub mod session;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{FileStorage, FrontmatterParser, LocalPostStore};
use session::FeedSession;

/// The main feed application
#[derive(Clone)]
pub struct Feed {
    /// Feed configuration
    pub config: config::FeedConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown document path
    pub document_path: PathBuf,
    /// Storage file path
    pub storage_path: PathBuf,
}

impl Feed {
    /// Create a new Feed instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(config::CONFIG_FILE);

        let config = if config_path.exists() {
            config::FeedConfig::load(&config_path)?
        } else {
            config::FeedConfig::default()
        };

        let document_path = base_dir.join(&config.document);
        let storage_path = base_dir.join(&config.storage);

        Ok(Self {
            config,
            base_dir,
            document_path,
            storage_path,
        })
    }

    /// Store of the user's own posts
    pub fn store(&self) -> LocalPostStore<FileStorage> {
        LocalPostStore::with_key(
            FileStorage::new(&self.storage_path),
            self.config.storage_key.as_str(),
        )
    }

    /// Parser for the markdown document
    pub fn parser(&self) -> FrontmatterParser {
        FrontmatterParser::new(self.config.default_author.as_str())
    }

    /// Load both sources and open a session over the merged feed
    pub async fn open_session(&self) -> FeedSession<FileStorage> {
        let store = self.store();
        let posts = content::loader::load_feed(&store, &self.document_path, &self.parser()).await;
        FeedSession::new(store, posts)
    }
}
