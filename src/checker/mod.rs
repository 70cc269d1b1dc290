// src/checker/mod.rs
// =============================================================================
// This module contains the health classifier.
//
// Submodules:
// - health: the Health enum and the UrlHealth result record
// - http: makes the HTTP request and classifies the outcome
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::HealthChecker` instead of
// `checker::http::HealthChecker`.
// =============================================================================

mod health;
mod http;

pub use health::{Health, UrlHealth};
pub use http::HealthChecker;
