//! View controllers and the plumbing they share.
//!
//! Each controller owns one state bundle and is the only thing that mutates
//! it. Every user operation is split in two halves:
//!
//! 1. an intent (`select_category`, `submit_search`, `begin`, ...) that
//!    updates state synchronously and hands back a [`FetchTicket`]
//! 2. [`complete`](list::ListController::complete), which applies the
//!    outcome of the request the ticket describes
//!
//! The async operations (`load_category`, `resolve`, ...) simply run both
//! halves around a [`NewsSource`](crate::api::NewsSource) call. Splitting them
//! lets a caller keep several requests in flight while [`Generations`]
//! guarantees only the newest one lands.
//!
//! State changes are pushed to listeners registered through [`Subscribers`].
//!
//! # Submodules
//!
//! - [`list`]: category browse, search and "load more" pagination
//! - [`detail`]: single-article resolution by position

pub mod detail;
pub mod list;

#[cfg(test)]
pub(crate) mod fake;

use crate::api::FetchRequest;
use std::fmt;

/// Handle for one in-flight request.
///
/// Carries the generation it was issued under; completing a ticket from an
/// older generation is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    request: FetchRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The request the caller should issue for this ticket.
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }
}

/// Monotonic request counter.
#[derive(Debug, Default)]
pub struct Generations {
    current: u64,
}

impl Generations {
    /// Issue a ticket for `request`, superseding every earlier one.
    pub fn issue(&mut self, request: FetchRequest) -> FetchTicket {
        self.current += 1;
        FetchTicket {
            generation: self.current,
            request,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.current
    }
}

/// Identifier returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// State-change listeners, called in subscription order.
pub struct Subscribers<T> {
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.listeners.len())
            .finish()
    }
}

impl<T> Subscribers<T> {
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn notify(&mut self, state: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(state);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}
