//! Helper functions for rendering
//!
//! Date formatting and the HTML renderer used by the `render` command and
//! the local server.

mod date;
mod html;

pub use date::*;
pub use html::*;
