//! Initialize a new feed directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Feed configuration

# Site
title: Feed
url: http://localhost:4000/

# Authors
author: Moi
default_author: Anonymous

# Sources
document: posts.md
storage: .postfeed/storage.json
storage_key: posts
"#;

/// Initialize a feed in the given directory
///
/// Existing files are left untouched.
pub fn init_feed(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
    }

    let document_path = target_dir.join("posts.md");
    if document_path.exists() {
        tracing::info!("Keeping existing {:?}", document_path);
    } else {
        let now = chrono::Utc::now();
        let sample = format!(
            r#"---
date: {}
author: postfeed
---
Welcome! Posts in this file are read-only. Write your own with `postfeed post "Hello"`.
"#,
            now.format("%Y-%m-%d %H:%M:%S")
        );
        fs::write(&document_path, sample)?;
    }

    Ok(())
}
