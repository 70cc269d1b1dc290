// src/config.rs
// =============================================================================
// Run settings, read once before any work starts.
//
// Sources, lowest to highest priority:
// 1. Built-in defaults
// 2. Environment variables (a .env file is loaded first if present)
// 3. Command-line flags
//
// The result is a plain Settings value that main passes into the pool and the
// store. Nothing reads the environment after this point.
// =============================================================================

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::cli::Cli;
use crate::store::RetryPolicy;

pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CASSANDRA_HOST: &str = "cassandra";
pub const DEFAULT_KEYSPACE: &str = "web_scraper";
const CASSANDRA_PORT: u16 = 9042;
const MAX_KEYSPACE_LEN: usize = 48;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid keyspace name '{0}': use letters, digits and '_', starting with a letter (max 48 chars)")]
    InvalidKeyspace(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// JSON file holding the list of URLs
    pub urls_path: PathBuf,
    /// Number of concurrent workers (always >= 1)
    pub workers: usize,
    /// Timeout applied to every single HTTP request
    pub request_timeout: Duration,
    /// Cassandra node as "host:port"
    pub cassandra_node: String,
    pub keyspace: String,
    /// How long to keep trying to reach Cassandra on startup
    pub connect_retry: RetryPolicy,
    /// Print results as JSON on stdout when the run ends
    pub json: bool,
}

impl Settings {
    // Loads .env (if any), then builds settings from the environment and CLI.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded environment file"),
            Err(e) => debug!(error = %e, "No environment file loaded"),
        }

        Self::from_lookup(cli, |key| env::var(key).ok())
    }

    // Same as `load`, but reads variables through `lookup` instead of the
    // process environment.
    pub fn from_lookup<F>(cli: &Cli, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workers = cli
            .workers
            .map(|n| n.to_string())
            .or_else(|| lookup("WORKERS"));

        let timeout_secs = cli
            .timeout_secs
            .map(|n| n.to_string())
            .or_else(|| lookup("REQUEST_TIMEOUT_SECS"));

        let host = lookup("CASSANDRA_HOST").filter(|h| !h.trim().is_empty());

        let keyspace = lookup("CASSANDRA_KEYSPACE")
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_KEYSPACE.to_string());
        let keyspace = validate_keyspace(keyspace.trim())?;

        let defaults = RetryPolicy::default();
        let connect_retry = RetryPolicy {
            attempts: parse_positive(lookup("CASSANDRA_CONNECT_ATTEMPTS").as_deref())
                .unwrap_or(defaults.attempts),
            backoff: lookup("CASSANDRA_CONNECT_BACKOFF_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.backoff),
        };

        Ok(Self {
            urls_path: cli.urls.clone(),
            workers: parse_worker_count(workers.as_deref()),
            request_timeout: Duration::from_secs(
                parse_positive(timeout_secs.as_deref()).unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            cassandra_node: node_address(host.as_deref().unwrap_or(DEFAULT_CASSANDRA_HOST)),
            keyspace,
            connect_retry,
            json: cli.json,
        })
    }
}

// Worker count: missing, unparseable or zero all mean "use the default".
pub fn parse_worker_count(raw: Option<&str>) -> usize {
    parse_positive(raw).unwrap_or(DEFAULT_WORKERS)
}

// Parses a strictly positive integer, ignoring surrounding whitespace.
fn parse_positive<T>(raw: Option<&str>) -> Option<T>
where
    T: std::str::FromStr + Default + PartialOrd,
{
    raw.and_then(|s| s.trim().parse::<T>().ok())
        .filter(|n| *n > T::default())
}

// Appends the default CQL port when the host doesn't name one.
fn node_address(host: &str) -> String {
    let host = host.trim();
    let has_port = host
        .rsplit_once(':')
        .map(|(_, port)| port.parse::<u16>().is_ok())
        .unwrap_or(false);

    if has_port {
        host.to_string()
    } else {
        format!("{}:{}", host, CASSANDRA_PORT)
    }
}

// The keyspace ends up inside CQL text, so only plain identifiers are allowed.
fn validate_keyspace(name: &str) -> Result<String, ConfigError> {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if starts_with_letter && rest_ok && name.len() <= MAX_KEYSPACE_LEN {
        Ok(name.to_string())
    } else {
        Err(ConfigError::InvalidKeyspace(name.to_string()))
    }
}
