// src/input.rs
// =============================================================================
// Reads the list of URLs to check.
//
// The file is a JSON array of strings:
//   ["https://example.com", "https://example.com/missing"]
//
// URLs are not validated here - a malformed URL simply ends up Unreachable.
// Order and duplicates are kept exactly as written.
// =============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read URL file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse URL file {path} as a JSON array of strings: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub async fn load_urls(path: &Path) -> Result<Vec<String>, InputError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// Like `load_urls`, but a missing or malformed file means an empty run.
pub async fn load_or_empty(path: &Path) -> Vec<String> {
    match load_urls(path).await {
        Ok(urls) => urls,
        Err(e) => {
            error!(error = %e, "Could not load URLs, nothing will be checked");
            Vec::new()
        }
    }
}
