// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the portfolio assistant.
//!
//! Exposes the query router as a chat endpoint alongside read-only portfolio
//! data, health, metrics and cache administration routes.

pub mod handlers;
pub mod server;

pub use server::{AppState, HealthState, ServerConfig, ServiceInfo, build_app, start_server};
