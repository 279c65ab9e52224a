// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-query telemetry sink.

use crate::error::FolioError;
use crate::types::QueryEvent;

/// Receives one [`QueryEvent`] per handled query plus cache lookups.
///
/// Callers treat failures as non-fatal; a sink error never changes the
/// result returned to the user.
pub trait TelemetrySink: Send + Sync {
    fn log_query(&self, event: &QueryEvent) -> Result<(), FolioError>;

    fn log_cache_hit(&self, query_hash: &str) -> Result<(), FolioError>;

    fn log_cache_miss(&self, query_hash: &str) -> Result<(), FolioError>;
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn log_query(&self, _event: &QueryEvent) -> Result<(), FolioError> {
        Ok(())
    }

    fn log_cache_hit(&self, _query_hash: &str) -> Result<(), FolioError> {
        Ok(())
    }

    fn log_cache_miss(&self, _query_hash: &str) -> Result<(), FolioError> {
        Ok(())
    }
}
