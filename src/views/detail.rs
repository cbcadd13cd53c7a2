//! The single-article page and its loading, error and not-found cards.

use super::format::{DateStyle, format_date, plain_text, reading_time, strip_truncation_marker, wrap};
use super::{RULE, TEXT_WIDTH};
use crate::controllers::detail::DetailState;
use crate::models::Article;
use crate::routes::Route;
use std::fmt::Write;

pub const BACK_TO_NEWS: &str = "< Back to News";
pub const BACK_TO_HOME: &str = "[ Back to Home ]";
pub const NOT_FOUND_TITLE: &str = "Article Not Found";
pub const NOT_FOUND_BODY: &str =
    "The article you're looking for doesn't exist or has been removed.";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const NO_CONTENT: &str =
    "No additional content available. Read the full article on the source website.";

const SKELETON: [usize; 7] = [24, 60, 16, 60, 60, 60, 45];

/// Render the detail page for `state`.
pub fn render(state: &DetailState) -> String {
    match state {
        DetailState::Loading => skeleton(),
        DetailState::Error(message) => card("Error", message),
        DetailState::NotFound => card(NOT_FOUND_TITLE, NOT_FOUND_BODY),
        DetailState::Loaded(article) => article_page(article),
    }
}

fn skeleton() -> String {
    let mut out = String::new();
    for width in SKELETON {
        writeln!(out, "{}", "░".repeat(width)).unwrap();
    }
    out
}

fn card(title: &str, body: &str) -> String {
    let mut out = String::new();
    writeln!(out, "{RULE}").unwrap();
    writeln!(out, "{title}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{body}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{BACK_TO_HOME} ({})", Route::List).unwrap();
    writeln!(out, "{RULE}").unwrap();
    out
}

/// Author line and the initial shown in its avatar.
pub fn byline(article: &Article) -> (char, &str) {
    match article.author.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        Some(author) => (author.chars().next().unwrap_or('A'), author),
        None => ('A', UNKNOWN_AUTHOR),
    }
}

fn article_page(article: &Article) -> String {
    let mut out = String::new();

    writeln!(out, "{BACK_TO_NEWS} ({})", Route::List).unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "[{}] | {} | {}",
        article.source.name,
        format_date(&article.published_at, DateStyle::Long),
        reading_time(article.content.as_deref(), article.description.as_deref()),
    )
    .unwrap();
    writeln!(out).unwrap();
    for line in wrap(&article.title, TEXT_WIDTH) {
        writeln!(out, "{line}").unwrap();
    }
    writeln!(out).unwrap();

    let (initial, author) = byline(article);
    writeln!(out, "({initial}) {author}").unwrap();

    if let Some(image) = article.url_to_image.as_deref().filter(|u| !u.is_empty()) {
        writeln!(out, "Image: {image}").unwrap();
    }
    writeln!(out).unwrap();

    if let Some(description) = article.description.as_deref() {
        for line in wrap(&plain_text(description), TEXT_WIDTH) {
            writeln!(out, "{line}").unwrap();
        }
        writeln!(out).unwrap();
    }

    writeln!(out, "{RULE}").unwrap();
    let body = article
        .content
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| plain_text(&strip_truncation_marker(c)))
        .unwrap_or_else(|| NO_CONTENT.to_string());
    for line in wrap(&body, TEXT_WIDTH) {
        writeln!(out, "{line}").unwrap();
    }

    if !article.url.is_empty() {
        writeln!(out).unwrap();
        writeln!(
            out,
            "Read Full Article on {}: {}",
            article.source.name, article.url
        )
        .unwrap();
    }

    writeln!(out, "{RULE}").unwrap();
    writeln!(out, "{BACK_TO_NEWS} ({})", Route::List).unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::detail::DETAIL_ERROR_MESSAGE;
    use crate::models::tests::sample_article;

    #[test]
    fn test_loaded_article_strips_marker() {
        let article = sample_article("Storm warning");
        let page = render(&DetailState::Loaded(article));

        assert!(page.contains("Storm warning"));
        assert!(page.contains("Content of Storm warning"));
        assert!(!page.contains("[+120 chars]"));
        assert!(page.contains("(J) Jane Roe"));
        assert!(page.contains("1 min read"));
        assert!(page.contains(
            "Read Full Article on Example Wire: https://example.com/Storm-warning"
        ));
    }

    #[test]
    fn test_missing_author_and_content() {
        let mut article = sample_article("Quiet day");
        article.author = None;
        article.content = None;
        let page = render(&DetailState::Loaded(article));

        assert!(page.contains(&format!("(A) {UNKNOWN_AUTHOR}")));
        assert!(page.contains("No additional content available."));
    }

    #[test]
    fn test_image_line_only_when_present() {
        let mut article = sample_article("Pictured");
        assert!(!render(&DetailState::Loaded(article.clone())).contains("Image:"));

        article.url_to_image = Some("https://example.com/p.jpg".to_string());
        assert!(render(&DetailState::Loaded(article)).contains("Image: https://example.com/p.jpg"));
    }

    #[test]
    fn test_error_and_not_found_cards_link_home() {
        let error = render(&DetailState::Error(DETAIL_ERROR_MESSAGE.to_string()));
        assert!(error.contains("Error"));
        assert!(error.contains(DETAIL_ERROR_MESSAGE));
        assert!(error.contains("[ Back to Home ] (/)"));

        let missing = render(&DetailState::NotFound);
        assert!(missing.contains(NOT_FOUND_TITLE));
        assert!(missing.contains(NOT_FOUND_BODY));
        assert!(missing.contains("[ Back to Home ] (/)"));
    }

    #[test]
    fn test_loading_is_skeleton_only() {
        let page = render(&DetailState::Loading);
        assert_eq!(page.lines().count(), SKELETON.len());
        assert!(page.lines().all(|l| l.chars().all(|c| c == '░')));
    }

    #[test]
    fn test_byline_blank_author() {
        let mut article = sample_article("x");
        article.author = Some("  ".to_string());
        assert_eq!(byline(&article), ('A', UNKNOWN_AUTHOR));
    }
}
