//! CLI commands

pub mod delete;
pub mod favorite;
pub mod init;
pub mod list;
pub mod post;
pub mod render;
