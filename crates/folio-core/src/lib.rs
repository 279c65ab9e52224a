// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the folio portfolio backend.
//!
//! Holds the error type, the response and request types, and the trait
//! seams (model client, portfolio store, telemetry sink) that the router
//! and the concrete backends agree on.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DEFAULT_RETRY_AFTER, FolioError};
pub use types::{
    AdapterType, CompletionRequest, ErrorKind, FitAnalysis, HandlerId, HealthStatus, KanbanCard,
    KanbanData, QueryContext, QueryEvent, RenderHint, RequestKind, ResultError, StructuredResult,
    SummaryData,
};

pub use traits::{ModelClient, NoopTelemetry, PluginAdapter, PortfolioStore, TelemetrySink};
