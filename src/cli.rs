// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag is optional. Worker count and timeout can also come from the
// environment (WORKERS, REQUEST_TIMEOUT_SECS); a flag always wins over the
// environment. See config.rs for how the two are merged.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// The whole CLI - there are no subcommands, one run checks one list.
#[derive(Parser, Debug)]
#[command(
    name = "url-sentinel",
    version,
    about = "Health-check a list of URLs concurrently and store the results in Cassandra",
    long_about = "url-sentinel reads a JSON array of URLs, checks each one with a single HTTP GET \
                  using a fixed pool of workers, classifies it as healthy, unhealthy or unreachable, \
                  and writes every result to Cassandra/ScyllaDB."
)]
pub struct Cli {
    /// JSON file containing an array of URL strings
    #[arg(long, default_value = "urls.json")]
    pub urls: PathBuf,

    /// Number of concurrent workers (overrides WORKERS, default 5)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds (overrides REQUEST_TIMEOUT_SECS, default 10)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Also print the results as a JSON array on stdout
    #[arg(long)]
    pub json: bool,
}
