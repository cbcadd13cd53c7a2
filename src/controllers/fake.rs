//! Scripted in-memory [`NewsSource`] for controller tests.

use crate::api::{FetchRequest, NewsSource};
use crate::error::{NewsError, Result};
use crate::models::Article;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Replays queued outcomes in order and records every request it sees.
///
/// Clones share the same script and request log.
#[derive(Clone, Default)]
pub(crate) struct FakeSource {
    script: Rc<RefCell<VecDeque<Result<Vec<Article>>>>>,
    requests: Rc<RefCell<Vec<FetchRequest>>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_ok(&self, batch: Vec<Article>) -> &Self {
        self.script.borrow_mut().push_back(Ok(batch));
        self
    }

    pub(crate) fn push_err(&self, err: NewsError) -> &Self {
        self.script.borrow_mut().push_back(Err(err));
        self
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.borrow().clone()
    }
}

impl NewsSource for FakeSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Article>> {
        self.requests.borrow_mut().push(request.clone());
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response for {request}"))
    }
}

/// The error body the API sends when throttling.
pub(crate) fn rate_limited() -> NewsError {
    NewsError::Api {
        code: Some("rateLimited".to_string()),
        message: Some("rate limited".to_string()),
    }
}
