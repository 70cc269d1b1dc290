// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Build the run settings (environment + flags)
// 3. Connect to Cassandra - the only failure allowed to abort the run
// 4. Load the URL list (a bad file means an empty run, not a crash)
// 5. Check every URL with the worker pool, storing each result
// 6. Report the results
//
// Exit codes: 0 = the run completed, 1 = startup failed
// =============================================================================

mod checker;       // src/checker/ - HTTP health classification
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - settings from env + flags
mod input;         // src/input.rs - URL list loading
mod logging;       // src/logging.rs - tracing subscriber
mod output;        // src/output.rs - result reporting
mod pool;          // src/pool/ - the worker pool
mod store;         // src/store/ - result persistence

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use checker::HealthChecker;
use cli::Cli;
use config::Settings;
use pool::WorkerPool;
use store::{ResultSink, ScyllaStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Run aborted");
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(&cli).context("Invalid configuration")?;
    info!(
        workers = settings.workers,
        request_timeout_secs = settings.request_timeout.as_secs(),
        urls_file = %settings.urls_path.display(),
        "Configuration loaded"
    );

    let checker = HealthChecker::new(settings.request_timeout)?;

    info!("Initializing Cassandra...");
    let store = ScyllaStore::connect(
        &settings.cassandra_node,
        &settings.keyspace,
        settings.connect_retry,
    )
    .await
    .context("Failed to initialize Cassandra")?;
    let sink: Arc<dyn ResultSink> = Arc::new(store);

    let urls = input::load_or_empty(&settings.urls_path).await;

    let pool = WorkerPool::new(settings.workers, checker, sink);
    info!(urls = urls.len(), workers = pool.workers(), "Starting to check healthy urls");
    let report = pool.run(urls).await;

    output::print_results(&report, settings.json)?;
    info!("Program exiting...");
    Ok(())
}
