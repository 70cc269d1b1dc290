// src/pool/worker.rs
// =============================================================================
// One worker of the pool.
//
// Loop:
// 1. Take the next URL from the shared queue (stop when it's closed and empty)
// 2. Check it and time it
// 3. Send the result to the results channel
// 4. Try to store it - a failure is logged and the loop moves on
// =============================================================================

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error};

use crate::checker::{HealthChecker, UrlHealth};
use crate::store::ResultSink;

// The receiving half of the work queue, shared by every worker.
pub(super) type SharedQueue = Arc<Mutex<mpsc::Receiver<String>>>;

pub(super) struct Worker {
    pub id: usize,
    pub checker: HealthChecker,
    pub queue: SharedQueue,
    pub results: mpsc::Sender<UrlHealth>,
    pub sink: Arc<dyn ResultSink>,
}

impl Worker {
    // Runs until the queue is closed and drained.
    //
    // Returns how many URLs this worker processed.
    pub async fn run(self) -> usize {
        let mut processed = 0;

        while let Some(url) = self.next_url().await {
            let health = self.checker.check(url).await;
            processed += 1;

            // The buffer holds one slot per input URL, so this never waits.
            // It can only fail if the receiver is gone, which the pool never does
            // before the barrier.
            if self.results.send(health.clone()).await.is_err() {
                error!(worker = self.id, url = %health.url, "Results channel closed, dropping result");
            }

            self.persist(&health).await;
        }

        debug!(worker = self.id, processed, "Worker finished");
        processed
    }

    async fn next_url(&self) -> Option<String> {
        // The lock is held only while waiting for one message
        self.queue.lock().await.recv().await
    }

    async fn persist(&self, health: &UrlHealth) {
        debug!(
            worker = self.id,
            url = %health.url,
            healthy_url = health.is_healthy(),
            unhealthy_url = health.is_unhealthy(),
            unreachable_url = health.is_unreachable(),
            time_taken_ms = health.time_taken_ms,
            status_code = health.status_code,
            "Writing url health"
        );

        match self.sink.insert(health).await {
            Ok(()) => debug!(worker = self.id, url = %health.url, "Stored url health"),
            Err(e) => error!(
                worker = self.id,
                url = %health.url,
                error = %format!("{:#}", e),
                "Error writing url health to the store"
            ),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<Mutex<mpsc::Receiver>>?
//    - tokio's mpsc channel has exactly one receiver
//    - Several workers need to pull from the same queue
//    - Arc shares ownership, Mutex makes sure only one worker calls recv()
//      at a time; whoever holds the lock gets the next URL
//
// 2. How does a worker know when to stop?
//    - recv() returns None once every Sender is dropped AND the buffer is empty
//    - The pool drops its Sender after queueing the last URL
//    - So "queue closed" is the shutdown signal - no flags, no tokens
//
// 3. Why send the result before storing it?
//    - The in-memory report must never depend on the database
//    - A failed insert is logged, the result is already counted
// -----------------------------------------------------------------------------
