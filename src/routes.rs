//! Client routes: `/` for the list view and `/article/:id` for the detail view.

use crate::error::{NewsError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/article/:id`; the id is kept raw and parsed by the detail view.
    Article(String),
}

impl Route {
    pub fn article(position: usize) -> Self {
        Route::Article(position.to_string())
    }
}

impl FromStr for Route {
    type Err = NewsError;

    fn from_str(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        let without_query = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        if without_query.is_empty() {
            return Ok(Route::List);
        }

        let mut segments = without_query.trim_start_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("article"), Some(id), None) if !id.is_empty() => {
                let id = urlencoding::decode(id)
                    .map_err(|_| NewsError::UnknownRoute(path.to_string()))?;
                Ok(Route::Article(id.into_owned()))
            }
            _ => Err(NewsError::UnknownRoute(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => write!(f, "/"),
            Route::Article(id) => write!(f, "/article/{}", urlencoding::encode(id)),
        }
    }
}
