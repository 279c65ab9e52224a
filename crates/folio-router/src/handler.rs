// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single handler type parameterized by [`HandlerConfig`].
//!
//! Pipeline per call: degraded-mode check, cache lookup, context assembly,
//! one remote completion under a timeout, outcome normalization, cache
//! store, telemetry.

use std::sync::Arc;
use std::time::Duration;

use folio_core::{
    CompletionRequest, ErrorKind, FolioError, HandlerId, ModelClient, PortfolioStore, QueryContext,
    QueryEvent, RenderHint, RequestKind, ResultError, StructuredResult, TelemetrySink,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::{ResponseCache, query_hash};
use crate::degraded::DegradedModeResponder;
use crate::fit::{is_comparison_request, parse_structured_reply};
use crate::truncate_chars;

const EMPTY_REPLY_MESSAGE: &str =
    "I apologize, but I couldn't generate a proper response. Please try rephrasing your question.";

const GENERIC_ERROR_MESSAGE: &str = "I encountered an error while processing your request. \
     Please try again or contact support if the issue persists.";

/// Longest query text forwarded to telemetry.
const TELEMETRY_QUERY_CHARS: usize = 500;

/// Builds handler-specific context from the query and the portfolio.
pub type ContextAssembler = fn(&str, &dyn PortfolioStore) -> QueryContext;

/// How a successful reply is turned into a render hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    Text,
    ProjectInfo,
    /// Structured fit payload for comparison requests, analysis text otherwise.
    StrategicFit,
}

/// Per-category configuration, fixed at startup.
#[derive(Clone)]
pub struct HandlerConfig {
    pub id: HandlerId,
    pub system_prompt: String,
    pub assembler: ContextAssembler,
    pub post_process: PostProcess,
}

impl std::fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("id", &self.id)
            .field("system_prompt_len", &self.system_prompt.len())
            .field("post_process", &self.post_process)
            .finish()
    }
}

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct HandlerDeps {
    pub model: Option<Arc<dyn ModelClient>>,
    pub store: Arc<dyn PortfolioStore>,
    pub cache: Option<Arc<ResponseCache>>,
    pub telemetry: Arc<dyn TelemetrySink>,
    pub degraded: Arc<DegradedModeResponder>,
    pub timeout: Duration,
}

/// Outcome of [`Handler::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(StructuredResult),
    Miss,
    /// The call is not cacheable.
    Skipped,
}

/// Turns a classified query into a [`StructuredResult`].
pub struct Handler {
    config: HandlerConfig,
    deps: HandlerDeps,
}

impl Handler {
    pub fn new(config: HandlerConfig, deps: HandlerDeps) -> Self {
        Self { config, deps }
    }

    pub fn id(&self) -> HandlerId {
        self.config.id
    }

    pub fn system_prompt(&self) -> &str {
        &self.config.system_prompt
    }

    /// Answer a query. Never fails; every failure is encoded in the result.
    ///
    /// A non-empty `context` disables caching for this call.
    pub async fn process(&self, query: &str, context: Option<&QueryContext>) -> StructuredResult {
        match self.lookup(query, context) {
            CacheLookup::Hit(hit) => hit,
            CacheLookup::Miss => self.answer(query, context, true).await,
            CacheLookup::Skipped => self.answer(query, context, false).await,
        }
    }

    /// Like [`Handler::process`] for a caller that already got
    /// [`CacheLookup::Miss`] from [`Handler::lookup`] for this query.
    pub async fn process_after_miss(
        &self,
        query: &str,
        context: Option<&QueryContext>,
    ) -> StructuredResult {
        self.answer(query, context, true).await
    }

    /// Consult the cache under this handler's id.
    ///
    /// Skipped without a model (degraded answers are never cached), with a
    /// non-empty context, or when caching is off. Hits and misses are
    /// reported to telemetry; a hit is also recorded as a served query.
    pub fn lookup(&self, query: &str, context: Option<&QueryContext>) -> CacheLookup {
        let started = Instant::now();
        let context = context.filter(|c| !c.is_empty());
        let cache = match (&self.deps.model, &self.deps.cache, context) {
            (Some(_), Some(cache), None) => cache,
            _ => return CacheLookup::Skipped,
        };

        match cache.get(query, self.config.id.as_str()) {
            Some(mut hit) => {
                self.note_cache(query, true);
                hit.cached = true;
                hit.processing_time_secs = 0.0;
                self.record(query, None, &hit, started.elapsed());
                CacheLookup::Hit(hit)
            }
            None => {
                self.note_cache(query, false);
                CacheLookup::Miss
            }
        }
    }

    async fn answer(
        &self,
        query: &str,
        context: Option<&QueryContext>,
        cacheable: bool,
    ) -> StructuredResult {
        let started = Instant::now();
        let context = context.filter(|c| !c.is_empty());

        let result = self.run(query, context, cacheable, started).await;
        self.record(query, context, &result, started.elapsed());
        result
    }

    async fn run(
        &self,
        query: &str,
        context: Option<&QueryContext>,
        cacheable: bool,
        started: Instant,
    ) -> StructuredResult {
        let id = self.config.id;

        let Some(model) = self.deps.model.as_ref() else {
            debug!(handler = %id, "no model configured, serving offline answer");
            return self.deps.degraded.respond(id, query);
        };

        let cache = self.deps.cache.as_ref().filter(|_| cacheable);

        let assembled = self.assemble_context(query, context);
        let request = CompletionRequest {
            kind: RequestKind::Answer,
            system_prompt: self.config.system_prompt.clone(),
            user_message: format_user_message(query, &assembled),
            timeout: self.deps.timeout,
        };

        info!(handler = %id, query = truncate_chars(query, 100), "processing query");
        let outcome = match tokio::time::timeout(self.deps.timeout, model.complete(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FolioError::Timeout {
                duration: self.deps.timeout,
            }),
        };
        let elapsed = started.elapsed().as_secs_f64();

        let result = match outcome {
            Ok(text) => self.normalize(query, &text, elapsed),
            Err(err) => self.failure(&err, elapsed),
        };

        if let Some(cache) = cache {
            if !result.is_error() {
                cache.set(query, id.as_str(), &result);
            }
        }
        result
    }

    /// Handler context merged with the caller's; the caller wins on key collisions.
    fn assemble_context(&self, query: &str, caller: Option<&QueryContext>) -> QueryContext {
        let mut assembled = (self.config.assembler)(query, self.deps.store.as_ref());
        if let Some(caller) = caller {
            for (key, value) in caller {
                assembled.insert(key.clone(), value.clone());
            }
        }
        assembled
    }

    fn normalize(&self, query: &str, reply: &str, elapsed: f64) -> StructuredResult {
        let id = self.config.id;
        let text = reply.trim();
        if text.is_empty() {
            warn!(handler = %id, "model returned an empty reply");
            return StructuredResult::failure(
                id.as_str(),
                EMPTY_REPLY_MESSAGE,
                ResultError::new(ErrorKind::EmptyReply, "empty response from model"),
                elapsed,
            );
        }

        let content = text.to_string();
        let render_hint = match self.config.post_process {
            PostProcess::Text => RenderHint::Text {
                content: content.clone(),
            },
            PostProcess::ProjectInfo => RenderHint::ProjectInfo {
                content: content.clone(),
            },
            PostProcess::StrategicFit if is_comparison_request(query) => {
                RenderHint::StrategicFitAnalysis(parse_structured_reply(
                    text,
                    elapsed,
                    id.display_name(),
                ))
            }
            PostProcess::StrategicFit => RenderHint::StrategicAnalysis {
                content: content.clone(),
            },
        };

        info!(handler = %id, elapsed_secs = elapsed, "query answered");
        StructuredResult {
            response: content,
            render_hint,
            handler_id: id.as_str().to_string(),
            processing_time_secs: elapsed,
            cached: false,
            routed_to: None,
            total_processing_time_secs: None,
            error: None,
        }
    }

    fn failure(&self, err: &FolioError, elapsed: f64) -> StructuredResult {
        let id = self.config.id;

        if let Some(retry_after) = err.rate_limit_hint() {
            warn!(
                handler = %id,
                retry_after_secs = retry_after.as_secs(),
                error = %err,
                "model rate limited"
            );
            let message = format!(
                "I'm experiencing high demand right now. Please try again in about {} seconds.",
                retry_after.as_secs()
            );
            return StructuredResult::failure(
                id.as_str(),
                message,
                ResultError::rate_limited("the model provider is rate limiting requests", retry_after),
                elapsed,
            );
        }

        let detail = if err.is_timeout() {
            "the model request timed out"
        } else {
            "the model request failed"
        };
        warn!(handler = %id, error = %err, "model call failed");
        StructuredResult::failure(
            id.as_str(),
            GENERIC_ERROR_MESSAGE,
            ResultError::new(ErrorKind::Upstream, detail),
            elapsed,
        )
    }

    fn note_cache(&self, query: &str, hit: bool) {
        let hash = query_hash(query);
        let outcome = if hit {
            self.deps.telemetry.log_cache_hit(&hash)
        } else {
            self.deps.telemetry.log_cache_miss(&hash)
        };
        if let Err(e) = outcome {
            debug!(error = %e, "telemetry sink rejected cache event");
        }
    }

    fn record(
        &self,
        query: &str,
        context: Option<&QueryContext>,
        result: &StructuredResult,
        latency: Duration,
    ) {
        let event = QueryEvent {
            session_id: session_id(context),
            query_text: truncate_chars(query, TELEMETRY_QUERY_CHARS).to_string(),
            handler_id: result.handler_id.clone(),
            latency,
            cached: result.cached,
            errored: result.is_error(),
        };
        if let Err(e) = self.deps.telemetry.log_query(&event) {
            debug!(error = %e, "telemetry sink rejected query event");
        }
    }
}

/// Session identifier from the caller context, `"unknown"` when absent.
pub fn session_id(context: Option<&QueryContext>) -> String {
    context
        .and_then(|c| c.get("session_id"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string()
}

/// The user turn sent to the model.
pub fn format_user_message(query: &str, context: &QueryContext) -> String {
    let rendered = serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    format!("User Query: {query}\nContext: {rendered}")
}
