//! News API access.
//!
//! This module is the one seam between the controllers and the network:
//! - [`FetchRequest`]: which endpoint and page a controller wants
//! - [`NewsSource`]: core trait defining an async batch fetch
//! - [`NewsApiClient`]: reqwest-backed implementation against NewsAPI v2
//!
//! Every call issues exactly one request. There is no retry, backoff or
//! caching; the only time limit is the HTTP client's configured timeout.
//!
//! # Endpoints
//!
//! | Request | Path | Query |
//! |---------|------|-------|
//! | [`FetchRequest::TopHeadlines`] | `/v2/top-headlines` | `country`, `category`, `apiKey`, `page` |
//! | [`FetchRequest::Everything`] | `/v2/everything` | `q`, `apiKey`, `page` |
//! | [`FetchRequest::Headlines`] | `/v2/top-headlines` | `country`, `apiKey` |

use crate::config::ReaderConfig;
use crate::error::{NewsError, Result};
use crate::models::{Article, NewsResponse};
use reqwest::StatusCode;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// A single batch fetch against the news API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// One page of top headlines for a category.
    TopHeadlines { category: String, page: u32 },
    /// One page of full-text search results.
    Everything { query: String, page: u32 },
    /// The unfiltered top-headlines batch the detail view indexes into.
    Headlines,
}

impl FetchRequest {
    /// Request for a list page: search when `query` is non-empty, otherwise
    /// browse `category`.
    pub fn for_list(category: &str, query: &str, page: u32) -> Self {
        if query.is_empty() {
            FetchRequest::TopHeadlines {
                category: category.to_string(),
                page,
            }
        } else {
            FetchRequest::Everything {
                query: query.to_string(),
                page,
            }
        }
    }

    /// 1-based page this request asks for.
    pub fn page(&self) -> u32 {
        match self {
            FetchRequest::TopHeadlines { page, .. } | FetchRequest::Everything { page, .. } => {
                *page
            }
            FetchRequest::Headlines => 1,
        }
    }

    fn path(&self) -> &'static str {
        match self {
            FetchRequest::TopHeadlines { .. } | FetchRequest::Headlines => "v2/top-headlines",
            FetchRequest::Everything { .. } => "v2/everything",
        }
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchRequest::TopHeadlines { category, page } => {
                write!(f, "top-headlines category={category} page={page}")
            }
            FetchRequest::Everything { query, page } => {
                write!(f, "everything q={query:?} page={page}")
            }
            FetchRequest::Headlines => write!(f, "top-headlines"),
        }
    }
}

/// Trait for fetching article batches.
///
/// Controllers are generic over this so they can run against the real API
/// or an in-memory source in tests.
pub trait NewsSource {
    /// Fetch one batch.
    ///
    /// # Errors
    ///
    /// [`NewsError::Api`] when the server answered with a non-`"ok"` body;
    /// transport, HTTP status or decode errors otherwise.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Article>>;
}

/// NewsAPI v2 client. Clones share one connection pool.
#[derive(Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    country: String,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("country", &self.country)
            .finish()
    }
}

impl NewsApiClient {
    /// Build a client from resolved settings.
    ///
    /// Fails with [`NewsError::MissingApiKey`] before any request is made
    /// when no key was configured.
    pub fn new(config: &ReaderConfig) -> Result<Self> {
        let api_key = config.api_key()?.to_string();

        // `Url::join` replaces the last path segment unless the base ends in '/'.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
            country: config.country.clone(),
        })
    }

    /// Absolute URL for `request`, query values percent-encoded.
    pub fn request_url(&self, request: &FetchRequest) -> Result<Url> {
        let mut url = self.base_url.join(request.path())?;
        {
            let mut query = url.query_pairs_mut();
            match request {
                FetchRequest::TopHeadlines { category, page } => {
                    query
                        .append_pair("country", &self.country)
                        .append_pair("category", category)
                        .append_pair("apiKey", &self.api_key)
                        .append_pair("page", &page.to_string());
                }
                FetchRequest::Everything { query: q, page } => {
                    query
                        .append_pair("q", q)
                        .append_pair("apiKey", &self.api_key)
                        .append_pair("page", &page.to_string());
                }
                FetchRequest::Headlines => {
                    query
                        .append_pair("country", &self.country)
                        .append_pair("apiKey", &self.api_key);
                }
            }
        }
        Ok(url)
    }
}

impl NewsSource for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(request = %request))]
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Article>> {
        let url = self.request_url(request)?;
        debug!(url = %redacted_url(&url), "Requesting batch");

        let t0 = Instant::now();
        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis(), error = %e, "Request failed");
                return Err(e.into());
            }
        };
        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        let res = decode_body(status, &body);
        match &res {
            Ok(articles) => info!(
                elapsed_ms = dt.as_millis(),
                status = status.as_u16(),
                count = articles.len(),
                "Fetched batch"
            ),
            Err(e) => warn!(
                elapsed_ms = dt.as_millis(),
                status = status.as_u16(),
                error = %e,
                "Batch fetch failed"
            ),
        }
        res
    }
}

/// Turn an HTTP status and body into a batch.
///
/// A decodable body decides the outcome through its `status` field, even on
/// HTTP errors (NewsAPI sends `{status:"error", message}` with 4xx codes). An
/// `"ok"` body on a non-success status, or an undecodable body on one, is an
/// [`NewsError::HttpStatus`].
pub fn decode_body(status: StatusCode, body: &str) -> Result<Vec<Article>> {
    match serde_json::from_str::<NewsResponse>(body) {
        Ok(parsed) if !status.is_success() && parsed.status == "ok" => {
            Err(NewsError::HttpStatus(status.as_u16()))
        }
        Ok(parsed) => parsed.into_articles(),
        Err(_) if !status.is_success() => Err(NewsError::HttpStatus(status.as_u16())),
        Err(e) => Err(NewsError::Decode(e)),
    }
}

/// Copy of `url` with the `apiKey` value masked, for logging.
pub fn redacted_url(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "apiKey" {
                (k.into_owned(), "***".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NewsApiClient {
        let config = ReaderConfig {
            api_key: Some("k3y".to_string()),
            ..ReaderConfig::default()
        };
        NewsApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_top_headlines_url() {
        let url = client()
            .request_url(&FetchRequest::TopHeadlines {
                category: "technology".to_string(),
                page: 2,
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/top-headlines?country=us&category=technology&apiKey=k3y&page=2"
        );
    }

    #[test]
    fn test_everything_url_encodes_query() {
        let url = client()
            .request_url(&FetchRequest::Everything {
                query: "solar & wind".to_string(),
                page: 1,
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/everything?q=solar+%26+wind&apiKey=k3y&page=1"
        );
    }

    #[test]
    fn test_headlines_url_has_no_category_or_page() {
        let url = client().request_url(&FetchRequest::Headlines).unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/top-headlines?country=us&apiKey=k3y"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let config = ReaderConfig {
            api_key: Some("k".to_string()),
            base_url: "http://localhost:8080/proxy".to_string(),
            ..ReaderConfig::default()
        };
        let url = NewsApiClient::new(&config)
            .unwrap()
            .request_url(&FetchRequest::Headlines)
            .unwrap();
        assert!(url.as_str().starts_with("http://localhost:8080/proxy/v2/top-headlines?"));
    }

    #[test]
    fn test_missing_key_fails_before_request() {
        let err = NewsApiClient::new(&ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, NewsError::MissingApiKey));
    }

    #[test]
    fn test_for_list_prefers_query() {
        assert_eq!(
            FetchRequest::for_list("sports", "", 3),
            FetchRequest::TopHeadlines {
                category: "sports".to_string(),
                page: 3
            }
        );
        assert_eq!(
            FetchRequest::for_list("sports", "cricket", 1),
            FetchRequest::Everything {
                query: "cricket".to_string(),
                page: 1
            }
        );
        assert_eq!(FetchRequest::Headlines.page(), 1);
    }

    #[test]
    fn test_redacted_url_masks_key() {
        let url = client().request_url(&FetchRequest::Headlines).unwrap();
        let shown = redacted_url(&url);
        assert!(!shown.contains("k3y"));
        assert!(shown.contains("apiKey=***") || shown.contains("apiKey=%2A%2A%2A"));
        assert!(shown.contains("country=us"));
    }

    #[test]
    fn test_decode_ok_body() {
        let body = r#"{"status":"ok","totalResults":1,"articles":[{"source":{"id":null,"name":"Wire"},"title":"A","url":"https://a","publishedAt":"2024-01-01T00:00:00Z"}]}"#;
        let articles = decode_body(StatusCode::OK, body).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "A");
    }

    #[test]
    fn test_decode_error_body_on_200() {
        let body = r#"{"status":"error","message":"rate limited"}"#;
        let err = decode_body(StatusCode::OK, body).unwrap_err();
        assert!(err.resolved_body());
        assert_eq!(err.user_message(), "rate limited");
    }

    #[test]
    fn test_decode_error_body_on_4xx() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid"}"#;
        let err = decode_body(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(matches!(err, NewsError::Api { .. }));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, NewsError::HttpStatus(502)));
        assert!(!err.resolved_body());

        let err = decode_body(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, NewsError::Decode(_)));
    }
}
