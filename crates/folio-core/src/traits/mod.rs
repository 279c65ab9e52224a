// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the router and its backends.
//!
//! The async traits use `#[async_trait]` so they can be held as trait objects.

pub mod adapter;
pub mod model;
pub mod portfolio;
pub mod telemetry;

pub use adapter::PluginAdapter;
pub use model::ModelClient;
pub use portfolio::PortfolioStore;
pub use telemetry::{NoopTelemetry, TelemetrySink};
