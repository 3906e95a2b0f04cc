//! Post record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of ids derived from the markdown document
pub const MARKDOWN_ID_PREFIX: &str = "md-";

/// Stable identifier of a post
///
/// Local posts carry a numeric id (creation time in milliseconds), markdown
/// posts a string id prefixed with `md-`. The JSON forms differ (number vs.
/// string) so the two spaces never collide in storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Local(i64),
    Markdown(String),
}

impl PostId {
    /// Id of a markdown post dated at `date`
    pub fn markdown(date: &DateTime<Utc>) -> Self {
        PostId::Markdown(format!("{}{}", MARKDOWN_ID_PREFIX, date.timestamp_millis()))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, PostId::Local(_))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Local(id) => write!(f, "{}", id),
            PostId::Markdown(id) => f.write_str(id),
        }
    }
}

impl FromStr for PostId {
    type Err = std::convert::Infallible;

    /// Plain integers are local ids, anything else is taken verbatim
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(id) => PostId::Local(id),
            Err(_) => PostId::Markdown(s.to_string()),
        })
    }
}

/// Where a post comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSource {
    /// Authored by the user, mutable and deletable
    Local,
    /// Parsed from the static document, read-only
    Markdown,
}

/// One feed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,

    /// Plain text body, escaped before display
    pub content: String,

    /// Publication instant, also the sort key
    pub timestamp: DateTime<Utc>,

    pub author: String,

    /// Favorite flag (only persisted for local posts)
    pub favorites: bool,

    pub source: PostSource,
}

impl PostRecord {
    /// Create a user-authored post
    pub fn local(id: i64, content: String, author: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: PostId::Local(id),
            content,
            timestamp,
            author,
            favorites: false,
            source: PostSource::Local,
        }
    }

    /// Create a post derived from the markdown document
    pub fn markdown(content: String, author: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: PostId::markdown(&timestamp),
            content,
            timestamp,
            author,
            favorites: false,
            source: PostSource::Markdown,
        }
    }

    pub fn is_local(&self) -> bool {
        self.source == PostSource::Local
    }
}
