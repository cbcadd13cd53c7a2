//! The list page: header, category bar, cards and footer.

use super::{RULE, category_filter, news_card};
use crate::controllers::list::ListState;
use std::fmt::Write;

pub const TITLE: &str = "News Blog";
pub const LOADING: &str = "Loading...";
pub const NO_ARTICLES: &str = "No articles found";
pub const NO_ARTICLES_HINT: &str = "Try a different search term or category";
pub const LOAD_MORE: &str = "[ Load More ]";

/// Render the whole list page for `state`.
pub fn render(state: &ListState, categories: &[String], year: i32) -> String {
    let mut page = String::new();

    writeln!(page, "{TITLE}").unwrap();
    writeln!(page, "{}", category_filter::render(categories, &state.active_category)).unwrap();
    if !state.search_query.is_empty() {
        writeln!(page, "Search: \"{}\"", state.search_query).unwrap();
    }
    writeln!(page, "{RULE}").unwrap();

    if let Some(error) = &state.error {
        writeln!(page, "! {error}").unwrap();
        writeln!(page).unwrap();
    }

    if state.loading && state.articles.is_empty() {
        writeln!(page, "{LOADING}").unwrap();
    } else {
        // Search results span every category, so cards only get a badge while browsing.
        let badge = state
            .search_query
            .is_empty()
            .then_some(state.active_category.as_str());
        for (position, article) in state.articles.iter().enumerate() {
            writeln!(page, "{}", news_card::render(position, article, badge)).unwrap();
        }

        if state.is_empty_result() {
            writeln!(page, "{NO_ARTICLES}").unwrap();
            writeln!(page, "{NO_ARTICLES_HINT}").unwrap();
        }

        if !state.articles.is_empty() {
            let control = if state.loading { LOADING } else { LOAD_MORE };
            writeln!(page, "{control}").unwrap();
        }
    }

    writeln!(page, "{RULE}").unwrap();
    writeln!(page, "© {year} {TITLE}. All rights reserved.").unwrap();
    page
}
