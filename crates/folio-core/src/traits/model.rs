// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote language model client trait.

use async_trait::async_trait;

use crate::error::FolioError;
use crate::traits::adapter::PluginAdapter;
use crate::types::CompletionRequest;

/// A client for the remote text-generation service.
///
/// Implementations must honor `request.timeout` and map quota exhaustion to
/// [`FolioError::RateLimited`] so handlers can tell callers when to retry.
/// An empty `Ok` string is a legal reply; handlers decide what it means.
#[async_trait]
pub trait ModelClient: PluginAdapter {
    /// Sends a single-shot completion request and returns the reply text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, FolioError>;
}
