// src/pool/mod.rs
// =============================================================================
// The worker pool: checks many URLs with a fixed number of concurrent workers.
//
// How a run works:
// 1. Create the work queue and the results channel, both sized to the number
//    of URLs so nobody ever waits on a full buffer
// 2. Spawn W workers (tokio::spawn, so they run in parallel on the
//    multi-threaded runtime) - before any URL is queued
// 3. Queue every URL, then close the queue by dropping the sender
// 4. Wait for every worker to exit (the barrier)
// 5. Drop our own results sender and drain the channel
//
// Because of step 4, a RunReport is never built from a partial result set.
//
// Submodules:
// - worker: the per-worker loop
// - report: RunReport and result draining
// =============================================================================

mod report;
mod worker;

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

use crate::checker::HealthChecker;
use crate::store::ResultSink;
use worker::Worker;

pub use report::RunReport;

pub struct WorkerPool {
    workers: usize,
    checker: HealthChecker,
    sink: Arc<dyn ResultSink>,
}

impl WorkerPool {
    // Parameters:
    //   workers: concurrency bound for the whole run (0 is treated as 1)
    //   checker: shared HTTP classifier
    //   sink: where every result is stored; must already be connected
    pub fn new(workers: usize, checker: HealthChecker, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            workers: workers.max(1),
            checker,
            sink,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    // Checks every URL exactly once and returns all results.
    pub async fn run(&self, urls: Vec<String>) -> RunReport {
        let started = Instant::now();

        // tokio channels need a capacity of at least 1
        let capacity = urls.len().max(1);
        let (url_tx, url_rx) = mpsc::channel::<String>(capacity);
        let (result_tx, result_rx) = mpsc::channel(capacity);
        let queue = Arc::new(Mutex::new(url_rx));

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    checker: self.checker.clone(),
                    queue: queue.clone(),
                    results: result_tx.clone(),
                    sink: self.sink.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        for url in urls {
            // Only fails if every worker is already gone (all panicked)
            if let Err(e) = url_tx.send(url).await {
                error!(url = %e.0, "No worker left to take URL");
            }
        }
        // Closing the queue is the shutdown signal for the workers
        drop(url_tx);

        for (id, outcome) in join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = outcome {
                error!(worker = id, error = %e, "Worker stopped abnormally");
            }
        }

        // Every worker has exited; ours is the last sender
        drop(result_tx);
        let results = report::drain(result_rx).await;
        let elapsed = started.elapsed();

        info!(
            urls = results.len(),
            workers = self.workers,
            elapsed_secs = elapsed.as_secs(),
            "Total time taken to check the health of all the urls: {} seconds",
            elapsed.as_secs()
        );

        RunReport { results, elapsed }
    }
}
