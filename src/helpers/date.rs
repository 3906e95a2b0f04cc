//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format the time shown in a post header (like "15 Jan at 10:30")
pub fn post_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%-d %b at %H:%M").to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Generate a <time> HTML element
pub fn time_tag<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        r#"<time class="post-time" datetime="{}">{}</time>"#,
        date_xml(date),
        post_time(date)
    )
}
