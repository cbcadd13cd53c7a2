//! List view controller: category browse, search, and "load more".
//!
//! # Fetch contract
//!
//! Starting a request sets `loading` and clears `error`. When the newest
//! request resolves, `loading` drops and then:
//!
//! | Outcome | `articles` | `error` |
//! |---------|------------|---------|
//! | success, page 1 | replaced by the batch | cleared |
//! | success, page N > 1 | batch appended, no dedup | cleared |
//! | error body (`status != "ok"`) | unchanged | server message |
//! | no body (transport, decode), page 1 | cleared | generic message |
//! | no body, page N > 1 | unchanged | generic message |

use super::{FetchTicket, Generations, SubscriptionId, Subscribers};
use crate::api::{FetchRequest, NewsSource};
use crate::error::Result;
use crate::models::Article;
use tracing::{debug, info, instrument, warn};

/// Everything the list page renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// Loaded articles in arrival order, across all pages.
    pub articles: Vec<Article>,
    pub loading: bool,
    pub error: Option<String>,
    /// Committed search; empty while browsing a category.
    pub search_query: String,
    pub active_category: String,
    /// Last page requested, 1-based.
    pub page: u32,
}

impl ListState {
    pub fn new(category: &str) -> Self {
        Self {
            articles: Vec::new(),
            loading: false,
            error: None,
            search_query: String::new(),
            active_category: category.to_string(),
            page: 1,
        }
    }

    /// "Load more" is offered once something is listed, and disabled while loading.
    pub fn can_load_more(&self) -> bool {
        !self.articles.is_empty() && !self.loading
    }

    /// A settled fetch with nothing to show.
    pub fn is_empty_result(&self) -> bool {
        self.articles.is_empty() && !self.loading
    }

    fn current_request(&self) -> FetchRequest {
        FetchRequest::for_list(&self.active_category, &self.search_query, self.page)
    }
}

/// Owns the [`ListState`] and talks to a [`NewsSource`].
pub struct ListController<S> {
    source: S,
    state: ListState,
    generations: Generations,
    subscribers: Subscribers<ListState>,
}

impl<S: NewsSource> ListController<S> {
    /// Idle controller on `category`; nothing is fetched until [`mount`](Self::mount).
    pub fn new(source: S, category: &str) -> Self {
        Self {
            source,
            state: ListState::new(category),
            generations: Generations::default(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Call `listener` after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&ListState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Start the initial load of page 1 for the active category.
    pub fn begin_mount(&mut self) -> FetchTicket {
        self.state.page = 1;
        self.begin()
    }

    /// Switch category: page 1, search cleared, list replaced on success.
    pub fn select_category(&mut self, category: &str) -> FetchTicket {
        self.state.page = 1;
        self.state.search_query.clear();
        self.state.active_category = category.to_string();
        self.begin()
    }

    /// Submit a search. A blank query starts nothing and changes nothing.
    pub fn submit_search(&mut self, query: &str) -> Option<FetchTicket> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty search");
            return None;
        }
        self.state.page = 1;
        self.state.search_query = query.to_string();
        Some(self.begin())
    }

    /// Advance to the next page of the current category or search.
    ///
    /// Returns `None` when nothing is listed yet or a request is loading.
    /// The page counter stays advanced even if the request later fails.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.state.can_load_more() {
            debug!(
                loading = self.state.loading,
                listed = self.state.articles.len(),
                "Load more unavailable"
            );
            return None;
        }
        self.state.page += 1;
        Some(self.begin())
    }

    fn begin(&mut self) -> FetchTicket {
        let ticket = self.generations.issue(self.state.current_request());
        self.state.loading = true;
        self.state.error = None;
        debug!(generation = ticket.generation(), request = %ticket.request(), "List fetch started");
        self.subscribers.notify(&self.state);
        ticket
    }

    /// Apply the outcome of `ticket`'s request.
    ///
    /// Returns false, leaving state untouched, when a newer request has been
    /// started since `ticket` was issued.
    pub fn complete(&mut self, ticket: FetchTicket, outcome: Result<Vec<Article>>) -> bool {
        if !self.generations.is_current(&ticket) {
            debug!(generation = ticket.generation(), request = %ticket.request(), "Discarding stale list response");
            return false;
        }

        let page = ticket.request().page();
        self.state.loading = false;
        match outcome {
            Ok(batch) => {
                self.state.error = None;
                let received = batch.len();
                if page == 1 {
                    self.state.articles = batch;
                } else {
                    self.state.articles.extend(batch);
                }
                info!(page, received, total = self.state.articles.len(), "List updated");
            }
            Err(e) => {
                if page == 1 && !e.resolved_body() {
                    self.state.articles.clear();
                }
                warn!(page, error = %e, "List fetch failed");
                self.state.error = Some(e.user_message());
            }
        }
        self.subscribers.notify(&self.state);
        true
    }

    async fn run(&mut self, ticket: FetchTicket) {
        let outcome = self.source.fetch(ticket.request()).await;
        self.complete(ticket, outcome);
    }

    /// Initial load when the list view is entered.
    #[instrument(level = "info", skip(self), fields(category = %self.state.active_category))]
    pub async fn mount(&mut self) {
        let ticket = self.begin_mount();
        self.run(ticket).await;
    }

    /// Browse `category` from page 1.
    #[instrument(level = "info", skip(self))]
    pub async fn load_category(&mut self, category: &str) {
        let ticket = self.select_category(category);
        self.run(ticket).await;
    }

    /// Search from page 1. Returns false, without fetching, for a blank query.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&mut self, query: &str) -> bool {
        match self.submit_search(query) {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Append the next page. Returns false when load-more is unavailable.
    #[instrument(level = "info", skip(self), fields(page = self.state.page + 1))]
    pub async fn load_more(&mut self) -> bool {
        match self.next_page() {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }
}
