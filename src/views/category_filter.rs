//! Category selector bar.

use crate::utils::upcase;
use itertools::Itertools;

/// One line listing every category, the active one bracketed.
///
/// The active category stays highlighted while a search is showing.
pub fn render(categories: &[String], active: &str) -> String {
    categories
        .iter()
        .map(|c| {
            if c == active {
                format!("[{}]", upcase(c))
            } else {
                format!(" {} ", upcase(c))
            }
        })
        .join(" ")
}
