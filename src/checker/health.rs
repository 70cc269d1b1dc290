// src/checker/health.rs
// =============================================================================
// The data model for one health check.
//
// A URL ends up in exactly one of three states:
// - Healthy:     the server answered with 200 OK
// - Unhealthy:   the server answered, but with any other status code
// - Unreachable: no response at all (DNS failure, refused, timeout, bad URL)
//
// The state is derived from the response alone, so `Health::classify` is a
// plain function with no I/O - easy to test, impossible to get out of sync.
// =============================================================================

use serde::Serialize;

/// Status code recorded when the request never completed.
pub const NO_STATUS: u16 = 0;

/// The tri-state classification of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    /// HTTP 200
    Healthy,
    /// Any other HTTP status
    Unhealthy,
    /// No response at all
    Unreachable,
}

impl Health {
    /// Maps the outcome of a request to a classification.
    ///
    /// `None` means the request failed before a response arrived.
    pub fn classify(status: Option<u16>) -> Self {
        match status {
            None => Health::Unreachable,
            Some(200) => Health::Healthy,
            Some(_) => Health::Unhealthy,
        }
    }

    /// The three boolean facets (healthy, unhealthy, unreachable).
    ///
    /// Exactly one of them is true. The store keeps them as separate columns.
    pub fn flags(self) -> (bool, bool, bool) {
        (
            self == Health::Healthy,
            self == Health::Unhealthy,
            self == Health::Unreachable,
        )
    }
}

/// The outcome of checking a single URL.
///
/// Built once by a worker and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlHealth {
    /// The URL exactly as it appeared in the input list
    pub url: String,
    /// Healthy / Unhealthy / Unreachable
    #[serde(rename = "classification")]
    pub health: Health,
    /// Wall-clock time of the single HTTP attempt
    pub time_taken_ms: u64,
    /// HTTP status code, or 0 when no response arrived
    pub status_code: u16,
}

impl UrlHealth {
    pub fn is_healthy(&self) -> bool {
        self.health == Health::Healthy
    }

    pub fn is_unhealthy(&self) -> bool {
        self.health == Health::Unhealthy
    }

    pub fn is_unreachable(&self) -> bool {
        self.health == Health::Unreachable
    }
}
