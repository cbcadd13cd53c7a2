//! Small string helpers and the output directory check.

use crate::error::Result;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

const WRITE_PROBE: &str = ".newsdesk-write-probe";

/// Cut `s` to at most `max` bytes on a char boundary, noting how much was dropped.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Lowercase `title`, drop punctuation and join words with `-` for file names.
pub fn slugify_title(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Category label for display: `"technology"` becomes `"Technology"`.
pub fn upcase(s: &str) -> String {
    s.char_indices()
        .map(|(i, c)| if i == 0 { c.to_uppercase().to_string() } else { c.to_string() })
        .collect()
}

/// Create `path` if needed and check a file can be written inside it.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    let probe = Path::new(path).join(WRITE_PROBE);
    fs::write(&probe, b"").await?;
    if let Err(e) = fs::remove_file(&probe).await {
        warn!(probe = %probe.display(), error = %e, "Could not remove write probe");
    }
    info!("Output directory is writable");
    Ok(())
}
