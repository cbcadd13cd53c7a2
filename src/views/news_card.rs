//! Summary card for one article in the list grid.

use super::format::{DateStyle, format_date, plain_text, reading_time, wrap};
use super::TEXT_WIDTH;
use crate::models::Article;
use crate::utils::upcase;
use std::fmt::Write;

/// Render the card for the article at `position` in the list.
///
/// `position` doubles as the id used to open the detail route.
pub fn render(position: usize, article: &Article, category: Option<&str>) -> String {
    let mut card = String::new();

    let badge = category
        .map(|c| format!("  <{}>", upcase(c)))
        .unwrap_or_default();
    writeln!(card, "[{position}] {}{badge}", article.title.trim()).unwrap();

    writeln!(
        card,
        "    {} | {} | {}",
        article.source.name,
        format_date(&article.published_at, DateStyle::Short),
        reading_time(article.content.as_deref(), article.description.as_deref()),
    )
    .unwrap();

    if let Some(description) = article.description.as_deref() {
        // Cards clamp the summary to three lines.
        let lines = wrap(&plain_text(description), TEXT_WIDTH - 4);
        let clamped = lines.len() > 3;
        for (i, line) in lines.iter().take(3).enumerate() {
            let ellipsis = if clamped && i == 2 { "…" } else { "" };
            writeln!(card, "    {line}{ellipsis}").unwrap();
        }
    }

    if !article.url.is_empty() {
        writeln!(card, "    {}", article.url).unwrap();
    }
    card
}
