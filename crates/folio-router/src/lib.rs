// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query routing, response caching and degraded-mode fallback.
//!
//! A [`QueryRouter`] classifies each query with the [`KeywordClassifier`],
//! optionally confirms the category with the remote model, and hands the
//! query to the matching [`Handler`]. Handlers share one [`ResponseCache`]
//! and fall back to the [`DegradedModeResponder`] when no model is configured.

pub mod cache;
pub mod catalogue;
pub mod classifier;
pub mod degraded;
pub mod fit;
pub mod handler;
pub mod router;

pub use cache::{CacheStats, ResponseCache};
pub use classifier::{ClassificationResult, KeywordClassifier};
pub use degraded::DegradedModeResponder;
pub use handler::{CacheLookup, ContextAssembler, Handler, HandlerConfig, HandlerDeps, PostProcess};
pub use router::{QueryRouter, RouteDecision, RouterConfig, VerificationMode};

/// Longest prefix of `s` with at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
