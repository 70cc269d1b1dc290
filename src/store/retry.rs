// src/store/retry.rs
// =============================================================================
// Bounded retries with a fixed pause between attempts.
//
// Used only while connecting to the database: in a docker-compose setup the
// checker usually starts before Cassandra is accepting connections.
// =============================================================================

use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub attempts: u32,
    /// Pause between two attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            backoff: Duration::from_secs(15),
        }
    }
}

// Runs `op` until it succeeds or the policy runs out of attempts.
//
// Parameters:
//   policy: how many times to try and how long to wait in between
//   what: short description for the log lines ("connect to Cassandra")
//   op: closure producing a fresh future for each attempt
//
// Returns the first success, or the last error with the attempt count added.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => {
                info!(attempt, "Succeeded: {}", what);
                return Ok(value);
            }
            Err(e) => {
                if attempt < attempts {
                    warn!(
                        attempt,
                        attempts,
                        backoff_secs = policy.backoff.as_secs(),
                        error = %e,
                        "Failed to {}, retrying", what
                    );
                    tokio::time::sleep(policy.backoff).await;
                }
                last_error = Some(e);
            }
        }
    }

    let error = last_error.unwrap_or_else(|| anyhow!("no attempt was made"));
    Err(error.context(format!("failed to {} after {} attempts", what, attempts)))
}
