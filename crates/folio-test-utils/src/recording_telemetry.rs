// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry sink that keeps every event for assertions.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use folio_core::{FolioError, QueryEvent, TelemetrySink};

#[derive(Default)]
pub struct RecordingTelemetry {
    queries: Mutex<Vec<QueryEvent>>,
    hits: Mutex<Vec<String>>,
    misses: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records nothing and rejects every event.
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.failing.store(true, Ordering::SeqCst);
        sink
    }

    pub fn queries(&self) -> Vec<QueryEvent> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn cache_hits(&self) -> Vec<String> {
        self.hits.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn cache_misses(&self) -> Vec<String> {
        self.misses.lock().map(|m| m.clone()).unwrap_or_default()
    }

    fn push<T>(&self, target: &Mutex<Vec<T>>, item: T) -> Result<(), FolioError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FolioError::Internal("telemetry sink unavailable".into()));
        }
        target
            .lock()
            .map_err(|_| FolioError::Internal("telemetry lock poisoned".into()))?
            .push(item);
        Ok(())
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn log_query(&self, event: &QueryEvent) -> Result<(), FolioError> {
        self.push(&self.queries, event.clone())
    }

    fn log_cache_hit(&self, query_hash: &str) -> Result<(), FolioError> {
        self.push(&self.hits, query_hash.to_string())
    }

    fn log_cache_miss(&self, query_hash: &str) -> Result<(), FolioError> {
        self.push(&self.misses, query_hash.to_string())
    }
}
