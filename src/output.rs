// src/output.rs
// =============================================================================
// Reports the outcome of a run.
//
// - One log line per result and a summary line, always
// - A pretty JSON array on stdout when --json is given
//
// Logs go to stderr through tracing; only the JSON goes to stdout, so
// `url-sentinel --json > results.json` captures clean JSON.
// =============================================================================

use anyhow::Result;
use tracing::info;

use crate::checker::{Health, UrlHealth};
use crate::pool::RunReport;

// Logs every result, the summary, and optionally prints JSON.
pub fn print_results(report: &RunReport, json: bool) -> Result<()> {
    for (i, result) in report.results.iter().enumerate() {
        log_result(i + 1, result);
    }

    info!(
        total = report.total(),
        healthy = report.count(Health::Healthy),
        unhealthy = report.count(Health::Unhealthy),
        unreachable = report.count(Health::Unreachable),
        elapsed_secs = report.elapsed_secs(),
        "Checked {} url(s) in {} seconds",
        report.total(),
        report.elapsed_secs()
    );

    if json {
        println!("{}", render_json(&report.results)?);
    }
    Ok(())
}

fn log_result(index: usize, result: &UrlHealth) {
    info!(
        index,
        url = %result.url,
        healthy = result.is_healthy(),
        unhealthy = result.is_unhealthy(),
        unreachable = result.is_unreachable(),
        time_taken_ms = result.time_taken_ms,
        status_code = result.status_code,
        "URL {}", index
    );
}

fn render_json(results: &[UrlHealth]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}
