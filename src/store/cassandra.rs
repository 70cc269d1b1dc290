// src/store/cassandra.rs
// =============================================================================
// Stores health check results in Cassandra / ScyllaDB.
//
// What happens on startup:
// 1. Connect to the node (retrying while the database boots)
// 2. Create the keyspace and the url_healths table if they don't exist
// 3. Prepare the INSERT statement once
//
// After that, every result is one INSERT. The row id is generated by the
// database with CQL's uuid() function, so we never send one.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::statement::prepared::PreparedStatement;
use std::time::Duration;
use tracing::{debug, info};

use super::{retry, ResultSink, RetryPolicy};
use crate::checker::UrlHealth;

const TABLE: &str = "url_healths";
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

// A connected session plus the prepared INSERT.
//
// Session is Send + Sync and does its own connection pooling, so one store is
// shared by every worker without extra locking.
pub struct ScyllaStore {
    session: Session,
    insert: PreparedStatement,
}

impl ScyllaStore {
    // Connects and makes sure the schema exists.
    //
    // Parameters:
    //   node: "host:port" of any node in the cluster
    //   keyspace: a valid CQL identifier (checked by the config layer)
    //   policy: how long to keep trying while the database is unavailable
    pub async fn connect(node: &str, keyspace: &str, policy: RetryPolicy) -> Result<Self> {
        info!(%node, %keyspace, "Connecting to Cassandra");

        let session = retry(policy, "connect to Cassandra", || async {
            let session = SessionBuilder::new()
                .known_node(node)
                .connection_timeout(CONNECTION_TIMEOUT)
                .build()
                .await?;
            Ok::<_, anyhow::Error>(session)
        })
        .await?;

        setup_schema(&session, keyspace).await?;

        let insert = session
            .prepare(insert_cql(keyspace))
            .await
            .context("failed to prepare url_healths insert")?;

        Ok(Self { session, insert })
    }
}

// Creates the keyspace and table if they don't exist yet.
async fn setup_schema(session: &Session, keyspace: &str) -> Result<()> {
    session
        .query_unpaged(keyspace_cql(keyspace), ())
        .await
        .context("failed to create keyspace")?;
    debug!(%keyspace, "Keyspace is ready");

    session
        .query_unpaged(table_cql(keyspace), ())
        .await
        .context("failed to create table")?;
    debug!(%keyspace, table = TABLE, "Table is ready");

    Ok(())
}

fn keyspace_cql(keyspace: &str) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {} \
         WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': 1}}",
        keyspace
    )
}

fn table_cql(keyspace: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {}.{} (
            id UUID PRIMARY KEY,
            url text,
            healthy_url boolean,
            unhealthy_url boolean,
            unreachable_url boolean,
            time_taken int,
            status_code int
        )",
        keyspace, TABLE
    )
}

fn insert_cql(keyspace: &str) -> String {
    format!(
        "INSERT INTO {}.{} \
         (id, url, healthy_url, unhealthy_url, unreachable_url, time_taken, status_code) \
         VALUES (uuid(), ?, ?, ?, ?, ?, ?)",
        keyspace, TABLE
    )
}

// The bound values for one INSERT, in column order.
//
// CQL `int` is 32-bit; an absurdly long request saturates instead of wrapping.
fn row_values(health: &UrlHealth) -> (&str, bool, bool, bool, i32, i32) {
    let (healthy, unhealthy, unreachable) = health.health.flags();
    let time_taken = i32::try_from(health.time_taken_ms).unwrap_or(i32::MAX);

    (
        health.url.as_str(),
        healthy,
        unhealthy,
        unreachable,
        time_taken,
        i32::from(health.status_code),
    )
}

#[async_trait]
impl ResultSink for ScyllaStore {
    async fn insert(&self, health: &UrlHealth) -> Result<()> {
        self.session
            .execute_unpaged(&self.insert, row_values(health))
            .await
            .with_context(|| format!("failed to insert url health for {}", health.url))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Health;

    #[test]
    fn test_row_values_follow_column_order() {
        let health = UrlHealth {
            url: "https://example.com/missing".to_string(),
            health: Health::Unhealthy,
            time_taken_ms: 87,
            status_code: 404,
        };
        assert_eq!(
            row_values(&health),
            ("https://example.com/missing", false, true, false, 87, 404)
        );
    }

    #[test]
    fn test_row_values_saturate_time_taken() {
        let health = UrlHealth {
            url: "https://slow.example".to_string(),
            health: Health::Unreachable,
            time_taken_ms: u64::MAX,
            status_code: 0,
        };
        let (_, healthy, unhealthy, unreachable, time_taken, status) = row_values(&health);
        assert_eq!((healthy, unhealthy, unreachable), (false, false, true));
        assert_eq!(time_taken, i32::MAX);
        assert_eq!(status, 0);
    }

    #[test]
    fn test_statements_target_the_keyspace() {
        assert!(keyspace_cql("web_scraper").contains("IF NOT EXISTS web_scraper "));
        assert!(table_cql("web_scraper").contains("web_scraper.url_healths"));

        let insert = insert_cql("web_scraper");
        assert!(insert.starts_with("INSERT INTO web_scraper.url_healths"));
        assert!(insert.contains("VALUES (uuid(), ?, ?, ?, ?, ?, ?)"));
    }
}
