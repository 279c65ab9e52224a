// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any installed recorder collects these.

use metrics::{describe_counter, describe_gauge, describe_histogram};

pub const QUERIES_TOTAL: &str = "folio_queries_total";
pub const QUERY_LATENCY_SECONDS: &str = "folio_query_latency_seconds";
pub const CACHE_EVENTS_TOTAL: &str = "folio_cache_events_total";
pub const CACHE_ENTRIES: &str = "folio_cache_entries";

/// Register all folio metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(QUERIES_TOTAL, "Total queries answered");
    describe_histogram!(QUERY_LATENCY_SECONDS, "Query latency in seconds");
    describe_counter!(CACHE_EVENTS_TOTAL, "Response cache lookups by outcome");
    describe_gauge!(CACHE_ENTRIES, "Live response cache entries");
}

/// Record an answered query.
pub fn record_query(handler: &str, cached: bool, errored: bool) {
    metrics::counter!(
        QUERIES_TOTAL,
        "handler" => handler.to_string(),
        "cached" => bool_label(cached),
        "errored" => bool_label(errored)
    )
    .increment(1);
}

/// Record query latency.
pub fn record_latency(handler: &str, seconds: f64) {
    metrics::histogram!(QUERY_LATENCY_SECONDS, "handler" => handler.to_string()).record(seconds);
}

/// Record a cache lookup; `outcome` is `hit` or `miss`.
pub fn record_cache_event(outcome: &'static str) {
    metrics::counter!(CACHE_EVENTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Set the number of live cache entries.
pub fn set_cache_entries(count: usize) {
    metrics::gauge!(CACHE_ENTRIES).set(count as f64);
}

fn bool_label(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
