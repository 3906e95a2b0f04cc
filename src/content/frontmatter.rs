//! Front-matter document parsing
//!
//! A feed document is a flat text file cut into chunks by the literal `---`
//! delimiter. Non-empty chunks alternate between a metadata block of
//! `key: value` lines and the free-text content of one post.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;

use super::PostRecord;
use crate::error::{FeedError, Result};

/// Chunk delimiter
pub const DELIMITER: &str = "---";

/// Validated metadata of one post block
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Publication date (required)
    pub date: DateTime<Utc>,
    /// Author name (optional)
    pub author: Option<String>,
}

impl Metadata {
    /// Parse a metadata block
    ///
    /// Each line is split on its first colon, so values may contain colons
    /// themselves. Lines without a colon and unknown keys are ignored.
    pub fn from_block(block: &str) -> Result<Self> {
        let mut fields = parse_fields(block);

        let raw_date = fields.shift_remove("date").ok_or(FeedError::MissingDate)?;
        let date = parse_date_string(&raw_date).ok_or(FeedError::InvalidDate(raw_date))?;
        let author = fields.shift_remove("author").filter(|a| !a.is_empty());

        Ok(Self { date, author })
    }
}

/// Split `key: value` lines into an ordered map
fn parse_fields(block: &str) -> IndexMap<String, String> {
    block
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Parses feed documents into post records
#[derive(Debug, Clone)]
pub struct FrontmatterParser {
    default_author: String,
}

impl FrontmatterParser {
    /// Create a parser; `default_author` is used for blocks without `author`
    pub fn new(default_author: impl Into<String>) -> Self {
        Self {
            default_author: default_author.into(),
        }
    }

    /// Parse a whole document
    ///
    /// A block with a missing or unparseable date is skipped together with
    /// its content chunk; the rest of the document is still parsed. A
    /// trailing chunk without a partner is ignored.
    pub fn parse(&self, document: &str) -> Vec<PostRecord> {
        let chunks: Vec<&str> = document
            .split(DELIMITER)
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .collect();

        let mut posts = Vec::with_capacity(chunks.len() / 2);

        for pair in chunks.chunks_exact(2) {
            let (meta, content) = (pair[0], pair[1]);
            match Metadata::from_block(meta) {
                Ok(metadata) => {
                    let author = metadata
                        .author
                        .unwrap_or_else(|| self.default_author.clone());
                    posts.push(PostRecord::markdown(
                        content.to_string(),
                        author,
                        metadata.date,
                    ));
                }
                Err(e) => {
                    tracing::debug!("Skipping document block: {}", e);
                }
            }
        }

        if chunks.len() % 2 == 1 {
            tracing::debug!("Ignoring dangling chunk at end of document");
        }

        posts
    }
}

/// Parse a date string in various formats
///
/// Date-times without an offset are taken as UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset_formats = ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let naive_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}
