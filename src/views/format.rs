//! Display values derived from an article at render time.
//!
//! Nothing here is stored on the article: dates, reading time and cleaned-up
//! text are recomputed every time a view renders.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::fmt::Display;

/// Reading speed used for the "N min read" estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Rendered in place of a timestamp that does not parse.
pub const INVALID_DATE: &str = "Invalid Date";

/// The API's "[+1234 chars]" suffix on truncated content.
static TRUNCATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\+\d+ chars\]").expect("truncation marker regex is valid"));

const LOCAL_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// How much of the date to spell out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Jul 15, 2023`, used on cards.
    Short,
    /// `July 15, 2023`, used in the detail view.
    Long,
}

impl DateStyle {
    fn pattern(self) -> &'static str {
        match self {
            DateStyle::Short => "%b %-d, %Y",
            DateStyle::Long => "%B %-d, %Y",
        }
    }
}

/// Format an ISO-8601 timestamp as a calendar date in the local time zone.
pub fn format_date(raw: &str, style: DateStyle) -> String {
    format_date_in(raw, style, &Local)
}

/// Format an ISO-8601 timestamp as a calendar date in `tz`.
///
/// Full RFC 3339 timestamps are converted to `tz`. Timestamps without an
/// offset are read as `tz` wall-clock time, and bare `YYYY-MM-DD` dates are
/// taken as-is. Anything else renders as [`INVALID_DATE`].
pub fn format_date_in<Tz>(raw: &str, style: DateStyle, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(tz).format(style.pattern()).to_string();
    }
    // No offset: the wall-clock time is already in `tz`.
    let local = LOCAL_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest());
    if let Some(dt) = local {
        return dt.format(style.pattern()).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(style.pattern()).to_string();
    }
    INVALID_DATE.to_string()
}

/// Estimated minutes to read `text`: words / 200, rounded up, at least 1.
pub fn reading_minutes(text: &str) -> usize {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// `"N min read"` for an article, counting `content`, or `description`
/// when the content is missing or empty.
pub fn reading_time(content: Option<&str>, description: Option<&str>) -> String {
    let text = content
        .filter(|c| !c.is_empty())
        .or(description)
        .unwrap_or_default();
    format!("{} min read", reading_minutes(text))
}

/// Drop the API's truncation marker from article content.
pub fn strip_truncation_marker(content: &str) -> String {
    TRUNCATION_MARKER.replace(content, "").trim_end().to_string()
}

/// Flatten HTML markup to its text, collapsing whitespace.
///
/// Some publishers put `<p>`/`<li>` markup in descriptions.
pub fn plain_text(text: &str) -> String {
    if !text.contains('<') {
        return text.split_whitespace().join(" ");
    }
    let fragment = Html::parse_fragment(text);
    let flattened = fragment.root_element().text().join(" ");
    flattened.split_whitespace().join(" ")
}

/// Greedy word wrap to `width` columns. Words longer than `width` get a line
/// of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
