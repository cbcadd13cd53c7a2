//! Detail view controller.
//!
//! Articles have no permanent identifier, so the detail route's `id` is a
//! position in a freshly fetched top-headlines batch. The same id can land on
//! a different article after the API reorders its headlines; out-of-range ids
//! fall back to the first headline.

use super::{FetchTicket, Generations, SubscriptionId, Subscribers};
use crate::api::{FetchRequest, NewsSource};
use crate::error::Result;
use crate::models::Article;
use tracing::{debug, info, instrument, warn};

/// Shown when the headline batch could not be fetched.
pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load article. Please try again later.";

/// The four mutually exclusive detail renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Error(String),
    /// The fetch succeeded but the batch was empty.
    NotFound,
    Loaded(Article),
}

/// Parse a route id the way a browser's `parseInt` would.
///
/// Leading whitespace is skipped and leading decimal digits are taken, so
/// `"2"`, `" 2"` and `"2abc"` all give `Some(2)`. Anything without leading
/// digits (including negative numbers) gives `None`.
pub fn parse_article_id(raw: &str) -> Option<usize> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    // Overflowing ids are as out of range as any other big number.
    Some(digits.parse().unwrap_or(usize::MAX))
}

/// Pick the article at `index`, falling back to the first one.
pub fn select_article(mut batch: Vec<Article>, index: Option<usize>) -> Option<Article> {
    match index {
        Some(i) if i < batch.len() => Some(batch.swap_remove(i)),
        _ if !batch.is_empty() => Some(batch.swap_remove(0)),
        _ => None,
    }
}

/// Resolves `/article/:id` into a [`DetailState`].
pub struct DetailController<S> {
    source: S,
    state: DetailState,
    index: Option<usize>,
    generations: Generations,
    subscribers: Subscribers<DetailState>,
}

impl<S: NewsSource> DetailController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: DetailState::Loading,
            index: None,
            generations: Generations::default(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DetailState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Enter the loading state for route id `id`.
    pub fn begin(&mut self, id: &str) -> FetchTicket {
        self.index = parse_article_id(id);
        let ticket = self.generations.issue(FetchRequest::Headlines);
        self.state = DetailState::Loading;
        debug!(id, index = ?self.index, generation = ticket.generation(), "Detail fetch started");
        self.subscribers.notify(&self.state);
        ticket
    }

    /// Apply the batch fetched for `ticket`.
    ///
    /// Returns false, leaving state untouched, for a superseded ticket.
    pub fn complete(&mut self, ticket: FetchTicket, outcome: Result<Vec<Article>>) -> bool {
        if !self.generations.is_current(&ticket) {
            debug!(generation = ticket.generation(), "Discarding stale detail response");
            return false;
        }

        self.state = match outcome {
            Ok(batch) => {
                let size = batch.len();
                match select_article(batch, self.index) {
                    Some(article) => {
                        info!(index = ?self.index, size, title = %article.title, "Resolved article");
                        DetailState::Loaded(article)
                    }
                    None => {
                        info!(index = ?self.index, "Headline batch empty; article not found");
                        DetailState::NotFound
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Detail fetch failed");
                DetailState::Error(DETAIL_ERROR_MESSAGE.to_string())
            }
        };
        self.subscribers.notify(&self.state);
        true
    }

    /// Fetch the headline batch and resolve route id `id` against it.
    #[instrument(level = "info", skip(self))]
    pub async fn resolve(&mut self, id: &str) {
        let ticket = self.begin(id);
        let outcome = self.source.fetch(ticket.request()).await;
        self.complete(ticket, outcome);
    }
}
