//! JSON snapshots of the list view.
//!
//! A snapshot records what the list showed after a `headlines` or `search`
//! run, so it can be consumed by other tools.
//!
//! # Output Structure
//!
//! Files are organized by date, named after the category or search:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── technology-p2.json
//!     └── search-solar-power-p1.json
//! ```

use crate::controllers::list::ListState;
use crate::models::Article;
use crate::utils::{ensure_writable_dir, slugify_title};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Serialized form of a list view.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Snapshot {
    /// RFC 3339 time the snapshot was taken.
    pub fetched_at: String,
    pub category: String,
    /// `None` when browsing a category.
    pub query: Option<String>,
    /// Pages loaded.
    pub page: u32,
    pub articles: Vec<Article>,
}

impl Snapshot {
    pub fn from_state(state: &ListState, fetched_at: DateTime<Local>) -> Self {
        Self {
            fetched_at: fetched_at.to_rfc3339(),
            category: state.active_category.clone(),
            query: (!state.search_query.is_empty()).then(|| state.search_query.clone()),
            page: state.page,
            articles: state.articles.clone(),
        }
    }

    /// File name without directory: `{label}-p{page}.json`.
    pub fn file_name(&self) -> String {
        let label = match &self.query {
            Some(q) => format!("search-{}", slugify_title(q)),
            None => slugify_title(&self.category),
        };
        format!("{}-p{}.json", label, self.page)
    }
}

/// Write `snapshot` under `{json_output_dir}/{date}/`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    snapshot: &Snapshot,
    json_output_dir: &str,
    date: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_json_dir = format!("{}/{}", json_output_dir.trim_end_matches('/'), date);
    info!(%full_json_dir, "Ensuring JSON directory exists");
    ensure_writable_dir(&full_json_dir).await?;

    let path = PathBuf::from(&full_json_dir).join(snapshot.file_name());
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = snapshot.articles.len(), "Wrote JSON snapshot");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_batch;

    fn state() -> ListState {
        let mut state = ListState::new("technology");
        state.articles = sample_batch("tech", 3);
        state.page = 2;
        state
    }

    #[test]
    fn test_file_names() {
        let snapshot = Snapshot::from_state(&state(), Local::now());
        assert_eq!(snapshot.file_name(), "technology-p2.json");
        assert_eq!(snapshot.query, None);

        let mut searching = state();
        searching.search_query = "Solar Power".to_string();
        searching.page = 1;
        let snapshot = Snapshot::from_state(&searching, Local::now());
        assert_eq!(snapshot.file_name(), "search-solar-power-p1.json");
    }

    #[tokio::test]
    async fn test_write_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let snapshot = Snapshot::from_state(&state(), Local::now());

        let path = write_snapshot(&snapshot, out, "2025-05-06").await.unwrap();

        assert_eq!(path, dir.path().join("2025-05-06").join("technology-p2.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Snapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.articles, snapshot.articles);
        assert_eq!(parsed.page, 2);
        assert!(written.contains("\"publishedAt\""));
    }
}
