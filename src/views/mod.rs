//! Presentational components.
//!
//! Stateless renderers that turn controller state into terminal text. None
//! of them fetch or mutate anything; the binary decides where the text goes.
//!
//! # Submodules
//!
//! - [`category_filter`]: the category selector bar
//! - [`news_card`]: one summary card in the list
//! - [`list`]: the full list page
//! - [`detail`]: the single-article page and its placeholder cards
//! - [`format`]: dates, reading time and text clean-up computed at render time

pub mod category_filter;
pub mod detail;
pub mod format;
pub mod list;
pub mod news_card;

/// Column width text is wrapped to.
pub const TEXT_WIDTH: usize = 78;

/// Horizontal separator between page sections.
pub const RULE: &str = "------------------------------------------------------------------------------";
