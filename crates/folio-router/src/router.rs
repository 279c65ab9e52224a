// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query routing: validate, classify, serve a cached answer when one exists,
//! otherwise optionally verify with the model and dispatch to a handler.
//!
//! [`QueryRouter::process_query`] is the boundary exposed to the HTTP layer
//! and never fails. Errors and panics below it become error results.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::Arc;

use folio_config::FolioConfig;
use folio_config::model::RoutingConfig;
use folio_core::{
    CompletionRequest, ErrorKind, FolioError, HandlerId, ModelClient, PortfolioStore, QueryContext,
    QueryEvent, RequestKind, ResultError, StructuredResult, TelemetrySink,
};
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::cache::ResponseCache;
use crate::catalogue::{builtin_handlers, routing_prompt};
use crate::classifier::{ClassificationResult, KeywordClassifier};
use crate::degraded::DegradedModeResponder;
use crate::handler::{CacheLookup, Handler, HandlerConfig, HandlerDeps, session_id};
use crate::truncate_chars;

const INTERNAL_ERROR_MESSAGE: &str =
    "I encountered an error while processing your request. Please try again.";

/// `handler_id` reported on results produced by the router itself.
const ROUTER_ID: &str = "router";
const ERROR_ID: &str = "error";

/// How much weight the remote verification call gets for a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMode {
    /// Confidence is high enough to trust keywords alone.
    Skip,
    /// Keywords are probably right; the model may override.
    Confirm,
    /// Keywords are weak; the model's answer is the primary signal.
    Primary,
}

/// The category a query was sent to and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteDecision {
    pub category: HandlerId,
    pub classification: ClassificationResult,
    pub mode: VerificationMode,
    /// True when the model's answer decided the category.
    pub verified: bool,
}

/// Everything the router needs, assembled by the composition root.
pub struct RouterConfig {
    pub routing: RoutingConfig,
    pub handlers: Vec<HandlerConfig>,
    pub store: Arc<dyn PortfolioStore>,
    pub cache: Option<Arc<ResponseCache>>,
    pub telemetry: Arc<dyn TelemetrySink>,
    pub model: Option<Arc<dyn ModelClient>>,
}

impl RouterConfig {
    /// Built-in handlers plus a cache sized from `config.cache` (if enabled).
    pub fn from_config(
        config: &FolioConfig,
        store: Arc<dyn PortfolioStore>,
        telemetry: Arc<dyn TelemetrySink>,
        model: Option<Arc<dyn ModelClient>>,
    ) -> Self {
        let handlers = builtin_handlers(store.as_ref(), &config.agent.owner);
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(ResponseCache::from_config(&config.cache)));
        Self {
            routing: config.routing.clone(),
            handlers,
            store,
            cache,
            telemetry,
            model,
        }
    }
}

/// Routes queries to handlers over the closed category set.
pub struct QueryRouter {
    classifier: KeywordClassifier,
    handlers: HashMap<HandlerId, Handler>,
    model: Option<Arc<dyn ModelClient>>,
    cache: Option<Arc<ResponseCache>>,
    telemetry: Arc<dyn TelemetrySink>,
    config: RoutingConfig,
}

impl QueryRouter {
    /// Build the router. Fails if any category lacks a handler.
    pub fn new(config: RouterConfig) -> Result<Self, FolioError> {
        let degraded = Arc::new(DegradedModeResponder::from_store(config.store.as_ref()));
        let deps = HandlerDeps {
            model: config.model.clone(),
            store: config.store,
            cache: config.cache.clone(),
            telemetry: config.telemetry.clone(),
            degraded,
            timeout: config.routing.handler_timeout(),
        };

        let mut handlers = HashMap::new();
        for handler_config in config.handlers {
            let id = handler_config.id;
            if handlers
                .insert(id, Handler::new(handler_config, deps.clone()))
                .is_some()
            {
                return Err(FolioError::Config(format!(
                    "handler `{id}` registered more than once"
                )));
            }
        }

        let missing: Vec<&str> = HandlerId::ALL
            .iter()
            .filter(|id| !handlers.contains_key(*id))
            .map(|id| id.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(FolioError::Config(format!(
                "no handler registered for: {}",
                missing.join(", ")
            )));
        }

        if config.model.is_none() {
            warn!("no model client configured, answering in degraded mode");
        }

        Ok(Self {
            classifier: KeywordClassifier::new(),
            handlers,
            model: config.model,
            cache: config.cache,
            telemetry: config.telemetry,
            config: config.routing,
        })
    }

    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    pub fn model_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn handler(&self, id: HandlerId) -> Option<&Handler> {
        self.handlers.get(&id)
    }

    /// Keyword classification only, no remote calls.
    pub fn classify(&self, query: &str) -> ClassificationResult {
        self.classifier.classify(query)
    }

    /// Answer a query. Never fails and never panics outward.
    pub async fn process_query(
        &self,
        query: &str,
        context: Option<&QueryContext>,
    ) -> StructuredResult {
        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.dispatch(query, context))
            .catch_unwind()
            .await;

        let elapsed = started.elapsed().as_secs_f64();
        let mut result = match outcome {
            Ok(Ok(result)) => {
                info!(
                    handler = %result.handler_id,
                    cached = result.cached,
                    elapsed_secs = elapsed,
                    "query processed"
                );
                result
            }
            Ok(Err(FolioError::Validation(message))) => {
                debug!(reason = %message, "query rejected");
                let result = StructuredResult::failure(
                    ROUTER_ID,
                    message.clone(),
                    ResultError::new(ErrorKind::Validation, message),
                    elapsed,
                );
                self.record(query, context, &result, started);
                result
            }
            Ok(Err(err)) => {
                error!(error = %err, "query processing failed");
                let result = internal_error(elapsed);
                self.record(query, context, &result, started);
                result
            }
            Err(panic) => {
                error!(panic = panic_message(panic.as_ref()), "query processing panicked");
                let result = internal_error(elapsed);
                self.record(query, context, &result, started);
                result
            }
        };

        result.total_processing_time_secs = Some(elapsed);
        result
    }

    async fn dispatch(
        &self,
        query: &str,
        context: Option<&QueryContext>,
    ) -> Result<StructuredResult, FolioError> {
        self.validate(query)?;

        // A cached answer under the keyword category is served before any
        // remote call, verification included.
        let classification = self.classifier.classify(query);
        let keyword_lookup = self
            .handlers
            .get(&classification.category)
            .map(|handler| handler.lookup(query, context));
        let keyword_missed = match keyword_lookup {
            Some(CacheLookup::Hit(mut hit)) => {
                debug!(handler = %classification.category, "served from cache before routing");
                hit.routed_to = Some(classification.category);
                return Ok(hit);
            }
            Some(CacheLookup::Miss) => true,
            Some(CacheLookup::Skipped) | None => false,
        };

        let decision = self.route_classified(query, classification).await;
        let handler = self.handlers.get(&decision.category).ok_or_else(|| {
            FolioError::Internal(format!("no handler for `{}`", decision.category))
        })?;

        let mut result = if keyword_missed && decision.category == classification.category {
            handler.process_after_miss(query, context).await
        } else {
            handler.process(query, context).await
        };
        result.routed_to = Some(decision.category);
        Ok(result)
    }

    fn validate(&self, query: &str) -> Result<(), FolioError> {
        if query.trim().is_empty() {
            return Err(FolioError::Validation(
                "Please enter a question so I can help.".to_string(),
            ));
        }
        let max = self.config.max_query_chars;
        if query.trim().chars().count() > max {
            return Err(FolioError::Validation(format!(
                "Your message is too long. Please keep it under {max} characters."
            )));
        }
        Ok(())
    }

    /// Resolve the category for a query, consulting the model when
    /// keyword confidence is not above the fast-path threshold.
    pub async fn route(&self, query: &str) -> RouteDecision {
        self.route_classified(query, self.classifier.classify(query))
            .await
    }

    async fn route_classified(
        &self,
        query: &str,
        classification: ClassificationResult,
    ) -> RouteDecision {
        let mode = self.verification_mode(classification.confidence);

        let verified = match (mode, self.model.as_ref()) {
            (VerificationMode::Skip, _) | (_, None) => None,
            (_, Some(model)) => self.verify(model.as_ref(), query).await,
        };

        let category = verified.unwrap_or(classification.category);
        if verified.is_some() && category != classification.category {
            info!(
                keyword = %classification.category,
                model = %category,
                confidence = classification.confidence,
                mode = ?mode,
                "model overrode keyword classification"
            );
        }
        debug!(
            category = %category,
            confidence = classification.confidence,
            mode = ?mode,
            query = truncate_chars(query, 100),
            "query routed"
        );

        RouteDecision {
            category,
            classification,
            mode,
            verified: verified.is_some(),
        }
    }

    fn verification_mode(&self, confidence: f64) -> VerificationMode {
        if !self.config.verify_with_model || confidence > self.config.fast_path_threshold {
            VerificationMode::Skip
        } else if confidence > self.config.confirm_threshold {
            VerificationMode::Confirm
        } else {
            VerificationMode::Primary
        }
    }

    /// One routing call. Any failure or out-of-set answer yields `None`,
    /// which means "keep the keyword result"; there is no second attempt.
    async fn verify(&self, model: &dyn ModelClient, query: &str) -> Option<HandlerId> {
        let timeout = self.config.verify_timeout();
        let request = CompletionRequest {
            kind: RequestKind::Routing,
            system_prompt: routing_prompt(query),
            user_message: query.to_string(),
            timeout,
        };

        match tokio::time::timeout(timeout, model.complete(request)).await {
            Ok(Ok(reply)) => {
                let parsed = parse_category(&reply);
                if parsed.is_none() {
                    debug!(
                        reply = truncate_chars(reply.trim(), 50),
                        "verification named an unknown category, keeping keyword result"
                    );
                }
                parsed
            }
            Ok(Err(err)) => {
                if err.rate_limit_hint().is_some() {
                    warn!(error = %err, "verification rate limited, keeping keyword result");
                } else {
                    debug!(error = %err, "verification failed, keeping keyword result");
                }
                None
            }
            Err(_) => {
                debug!(timeout_secs = timeout.as_secs(), "verification timed out");
                None
            }
        }
    }

    fn record(
        &self,
        query: &str,
        context: Option<&QueryContext>,
        result: &StructuredResult,
        started: Instant,
    ) {
        let event = QueryEvent {
            session_id: session_id(context),
            query_text: truncate_chars(query, 500).to_string(),
            handler_id: result.handler_id.clone(),
            latency: started.elapsed(),
            cached: false,
            errored: true,
        };
        if let Err(e) = self.telemetry.log_query(&event) {
            debug!(error = %e, "telemetry sink rejected query event");
        }
    }
}

/// Parse a model's one-word routing answer into a category.
///
/// Surrounding whitespace, quotes, backticks and trailing punctuation are
/// ignored, as is case.
pub fn parse_category(reply: &str) -> Option<HandlerId> {
    let cleaned = reply
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.' || c.is_whitespace())
        .to_lowercase();
    HandlerId::from_str(&cleaned).ok()
}

fn internal_error(elapsed: f64) -> StructuredResult {
    StructuredResult::failure(
        ERROR_ID,
        INTERNAL_ERROR_MESSAGE,
        ResultError::new(ErrorKind::Internal, "internal error"),
        elapsed,
    )
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_category_accepts_decorated_answers() {
        assert_eq!(parse_category("project"), Some(HandlerId::Project));
        assert_eq!(parse_category("  \"Strategic_Fit\".\n"), Some(HandlerId::StrategicFit));
        assert_eq!(parse_category("`demo`"), Some(HandlerId::Demo));
    }

    #[test]
    fn parse_category_rejects_outside_set() {
        assert_eq!(parse_category("weather"), None);
        assert_eq!(parse_category(""), None);
        assert_eq!(parse_category("the project agent"), None);
    }

    #[test]
    fn internal_error_is_generic() {
        let result = internal_error(0.1);
        assert_eq!(result.handler_id, "error");
        assert!(result.render_hint.is_error());
        assert_eq!(result.error.unwrap().kind, ErrorKind::Internal);
    }

    #[test]
    fn panic_payloads_are_described() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
