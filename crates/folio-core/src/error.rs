// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the folio backend.

use std::time::Duration;

use thiserror::Error;

/// Retry-after suggested to callers when the upstream gives no explicit hint.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Substrings that mark an upstream failure as quota or rate-limit related.
const RATE_LIMIT_MARKERS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "ratelimit",
    "quota",
    "resource_exhausted",
    "resource exhausted",
    "too many requests",
];

/// HTTP status that marks rate limiting; only matched as a whole token.
const RATE_LIMIT_STATUS: &str = "429";

/// The primary error type used across folio crates.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Rejected input (empty or oversized query).
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote model refused the call because of quota or rate limits.
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Remote model errors (API failure, malformed response, transport).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Portfolio data errors (missing file, invalid JSON, schema violations).
    #[error("portfolio error: {message}")]
    Portfolio {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FolioError {
    /// Returns the suggested retry-after when this error signals rate limiting.
    ///
    /// Besides the explicit [`FolioError::RateLimited`] variant, provider and
    /// internal errors are sniffed for quota markers, since some upstream
    /// failures only surface as a status code buried in a message.
    pub fn rate_limit_hint(&self) -> Option<Duration> {
        match self {
            FolioError::RateLimited { retry_after, .. } => {
                Some(retry_after.unwrap_or(DEFAULT_RETRY_AFTER))
            }
            FolioError::Provider { message, .. } | FolioError::Internal(message) => {
                let lower = message.to_lowercase();
                let status = lower
                    .split(|c: char| !c.is_ascii_alphanumeric())
                    .any(|token| token == RATE_LIMIT_STATUS);
                (status || RATE_LIMIT_MARKERS.iter().any(|m| lower.contains(m)))
                    .then_some(DEFAULT_RETRY_AFTER)
            }
            _ => None,
        }
    }

    /// Returns true if the error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FolioError::Timeout { .. })
    }
}
