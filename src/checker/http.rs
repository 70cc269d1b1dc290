// src/checker/http.rs
// =============================================================================
// This module checks a single URL by making one HTTP GET request.
//
// Key functionality:
// - One GET per URL, no retries
// - Follows redirects with reqwest's default policy
// - Every request has a timeout, so a dead server can't stall a worker forever
// - Never reads the response body; dropping the response frees the connection
//
// Network failures are NOT errors here. "Could not reach it" is a perfectly
// valid answer (Health::Unreachable), so check_health never returns Result.
// =============================================================================

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::health::{Health, UrlHealth, NO_STATUS};

// The classifier. Cheap to clone: reqwest::Client is reference counted
// internally, so every worker shares one connection pool.
#[derive(Debug, Clone)]
pub struct HealthChecker {
    client: Client,
}

impl HealthChecker {
    // Builds the shared HTTP client.
    //
    // Parameters:
    //   timeout: upper bound for one whole request (connect + response headers)
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("url-sentinel/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    // Wraps an already configured client.
    #[cfg(test)]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    // Performs the GET and classifies the outcome.
    //
    // Returns: (classification, status code). The status code is 0 when the
    // request never completed.
    pub async fn check_health(&self, url: &str) -> (Health, u16) {
        match self.client.get(url).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                // The body is never read; the response is dropped right here
                drop(response);
                (Health::classify(Some(code)), code)
            }
            Err(e) => {
                warn!(%url, error = %e, "Error reaching the URL");
                (Health::classify(None), NO_STATUS)
            }
        }
    }

    // Checks a URL and records how long the attempt took.
    pub async fn check(&self, url: String) -> UrlHealth {
        let started = Instant::now();
        let (health, status_code) = self.check_health(&url).await;
        let time_taken_ms = elapsed_ms(started.elapsed());

        debug!(%url, ?health, status_code, time_taken_ms, "URL checked");

        UrlHealth {
            url,
            health,
            time_taken_ms,
            status_code,
        }
    }
}

// Whole milliseconds, saturating instead of truncating.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
