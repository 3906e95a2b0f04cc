//! Library error type

use thiserror::Error;

use crate::content::PostId;

/// Errors raised by the feed core
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Metadata block has no date")]
    MissingDate,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid month filter: {0} (expected 'all' or YYYY-MM)")]
    InvalidFilter(String),

    #[error("Post content is empty")]
    EmptyPost,

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Post {0} comes from the markdown document and cannot be deleted")]
    ReadOnlyPost(PostId),
}

pub type Result<T, E = FeedError> = std::result::Result<T, E>;
