// src/pool/report.rs
// =============================================================================
// Collects the results of one run.
//
// Results arrive in whatever order the workers finish, which changes from run
// to run. Treat `results` as a bag: count it, filter it, never index into it
// expecting a particular URL.
// =============================================================================

use std::time::Duration;
use tokio::sync::mpsc;

use crate::checker::{Health, UrlHealth};

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// One entry per input URL, in arrival order
    pub results: Vec<UrlHealth>,
    /// From just before the queue was filled to just after the last worker exited
    pub elapsed: Duration,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Elapsed time truncated to whole seconds.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }

    pub fn count(&self, health: Health) -> usize {
        self.results.iter().filter(|r| r.health == health).count()
    }
}

// Drains every result still buffered in the channel.
//
// Must only be called once all senders are gone (after the worker barrier);
// then recv() returns None as soon as the buffer is empty.
pub(super) async fn drain(mut results: mpsc::Receiver<UrlHealth>) -> Vec<UrlHealth> {
    let mut collected = Vec::new();
    while let Some(health) = results.recv().await {
        collected.push(health);
    }
    collected
}
