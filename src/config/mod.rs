//! Configuration module

mod feed;

pub use feed::FeedConfig;
pub use feed::CONFIG_FILE;
