// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for folio integration tests.
//!
//! # Components
//!
//! - [`MockModelClient`] - Mock model with scripted routing and answer replies
//! - [`RecordingTelemetry`] - Telemetry sink that keeps every event
//! - [`TestHarness`] - Query router over the sample portfolio

pub mod harness;
pub mod mock_model;
pub mod recording_telemetry;

pub use harness::{SAMPLE_PORTFOLIO, TestHarness, sample_portfolio};
pub use mock_model::{DEFAULT_REPLY, MockModelClient, MockReply};
pub use recording_telemetry::RecordingTelemetry;
