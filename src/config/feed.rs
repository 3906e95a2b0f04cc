//! Feed configuration (_feed.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration file name, looked up in the base directory
pub const CONFIG_FILE: &str = "_feed.yml";

/// Main feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    // Site
    pub title: String,
    /// Page URL, used by the share links
    pub url: String,

    // Authors
    /// Name attached to posts written here
    pub author: String,
    /// Name used for document posts without an `author` key
    pub default_author: String,

    // Sources
    /// Markdown document, relative to the base directory
    pub document: String,
    /// Storage file, relative to the base directory
    pub storage: String,
    /// Storage key holding the post list
    pub storage_key: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Feed".to_string(),
            url: "http://localhost:4000/".to_string(),

            author: "Moi".to_string(),
            default_author: "Anonymous".to_string(),

            document: "posts.md".to_string(),
            storage: ".postfeed/storage.json".to_string(),
            storage_key: crate::content::store::DEFAULT_KEY.to_string(),
        }
    }
}

impl FeedConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: FeedConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.author, "Moi");
        assert_eq!(config.document, "posts.md");
        assert_eq!(config.storage_key, "posts");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Feed
author: Test User
document: notes/feed.md
"#;
        let config: FeedConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Feed");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.document, "notes/feed.md");
        assert_eq!(config.default_author, "Anonymous");
    }
}
