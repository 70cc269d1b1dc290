// src/store/mod.rs
// =============================================================================
// This module persists health check results.
//
// Submodules:
// - retry: bounded retry loop used while the database is still starting up
// - cassandra: the Cassandra/ScyllaDB implementation (scylla driver)
//
// The worker pool only knows about the ResultSink trait. Any type that can
// store one UrlHealth at a time - and is safe to call from many workers at
// once - can be plugged in.
// =============================================================================

mod retry;
mod cassandra;

use anyhow::Result;
use async_trait::async_trait;

use crate::checker::UrlHealth;

pub use retry::{retry, RetryPolicy};
pub use cassandra::ScyllaStore;

/// Durable destination for results.
///
/// Called once per result, concurrently by up to W workers. Implementations
/// must do their own synchronisation and generate their own record ids.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn insert(&self, health: &UrlHealth) -> Result<()>;
}
