//! Data models for the news API payloads.
//!
//! - [`Article`]: a single article as returned by the API, never mutated
//! - [`ArticleSource`]: the publisher of an article
//! - [`NewsResponse`]: the envelope every endpoint answers with
//!
//! Field names follow the API's camelCase JSON, mapped with serde renames.
//! Several fields are `null` in real payloads, so they are `Option`s here.

use crate::error::{NewsError, Result};
use serde::{Deserialize, Serialize};

/// The publisher of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleSource {
    /// API-side source identifier; absent for many publishers.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name of the publisher.
    #[serde(default)]
    pub name: String,
}

/// A news article as returned by the API.
///
/// Articles carry no stable identifier. Lists key them by position in the
/// batch they arrived in, so duplicates across pages are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// ISO-8601 timestamp, kept as sent; formatted at render time.
    #[serde(default)]
    pub published_at: String,
    /// Body text, possibly cut short by the API with a `[+N chars]` suffix.
    #[serde(default)]
    pub content: Option<String>,
}

/// Envelope returned by every endpoint.
///
/// A `status` other than `"ok"` is an application-level error even when the
/// HTTP status was 200.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewsResponse {
    /// Unwrap the batch, turning a non-`"ok"` status into [`NewsError::Api`].
    ///
    /// A successful body without an `articles` field yields an empty batch.
    pub fn into_articles(self) -> Result<Vec<Article>> {
        if self.status == "ok" {
            Ok(self.articles.unwrap_or_default())
        } else {
            Err(NewsError::Api {
                code: self.code,
                message: self.message,
            })
        }
    }
}
