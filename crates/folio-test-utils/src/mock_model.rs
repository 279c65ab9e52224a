// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model client for deterministic testing.
//!
//! `MockModelClient` implements `ModelClient` with scripted replies, one
//! FIFO queue per request kind, so routing and answer calls can be scripted
//! independently.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use folio_core::{
    AdapterType, CompletionRequest, FolioError, HealthStatus, ModelClient, PluginAdapter,
    RequestKind,
};

/// Reply returned when a queue is empty.
pub const DEFAULT_REPLY: &str = "mock response";

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Typed rate-limit error with an optional retry hint.
    RateLimited(Option<Duration>),
    /// Untyped provider failure with the given message.
    Fail(String),
    /// Never completes; only a timeout ends the call.
    Hang,
    Panic(String),
}

impl MockReply {
    pub fn text(s: impl Into<String>) -> Self {
        MockReply::Text(s.into())
    }
}

#[derive(Default)]
struct Script {
    routing: VecDeque<MockReply>,
    answer: VecDeque<MockReply>,
    requests: Vec<CompletionRequest>,
}

/// A mock model that returns pre-configured replies.
pub struct MockModelClient {
    script: Arc<Mutex<Script>>,
    routing_calls: AtomicUsize,
    answer_calls: AtomicUsize,
}

impl MockModelClient {
    /// Create a mock with empty queues.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            routing_calls: AtomicUsize::new(0),
            answer_calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock pre-loaded with answer replies.
    pub fn with_answers(answers: Vec<String>) -> Self {
        let mock = Self::new();
        if let Ok(mut script) = mock.script.try_lock() {
            script.answer = answers.into_iter().map(MockReply::Text).collect();
        }
        mock
    }

    /// Queue a reply for the next routing call.
    pub async fn push_routing(&self, reply: MockReply) {
        self.script.lock().await.routing.push_back(reply);
    }

    /// Queue a reply for the next answer call.
    pub async fn push_answer(&self, reply: MockReply) {
        self.script.lock().await.answer.push_back(reply);
    }

    pub fn routing_calls(&self) -> usize {
        self.routing_calls.load(Ordering::SeqCst)
    }

    pub fn answer_calls(&self) -> usize {
        self.answer_calls.load(Ordering::SeqCst)
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.script.lock().await.requests.clone()
    }

    async fn next_reply(&self, request: CompletionRequest) -> MockReply {
        let mut script = self.script.lock().await;
        let queue = match request.kind {
            RequestKind::Routing => {
                self.routing_calls.fetch_add(1, Ordering::SeqCst);
                &mut script.routing
            }
            RequestKind::Answer => {
                self.answer_calls.fetch_add(1, Ordering::SeqCst);
                &mut script.answer
            }
        };
        let reply = queue
            .pop_front()
            .unwrap_or_else(|| MockReply::text(DEFAULT_REPLY));
        script.requests.push(request);
        reply
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockModelClient {
    fn name(&self) -> &str {
        "mock-model"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, FolioError> {
        match self.next_reply(request).await {
            MockReply::Text(text) => Ok(text),
            MockReply::RateLimited(retry_after) => Err(FolioError::RateLimited {
                message: "mock quota exhausted".to_string(),
                retry_after,
            }),
            MockReply::Fail(message) => Err(FolioError::Provider {
                message,
                source: None,
            }),
            MockReply::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Ok(DEFAULT_REPLY.to_string())
            }
            MockReply::Panic(message) => panic!("{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: RequestKind) -> CompletionRequest {
        CompletionRequest {
            kind,
            system_prompt: "system".into(),
            user_message: "user".into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let mock = MockModelClient::new();
        let reply = mock.complete(request(RequestKind::Answer)).await.unwrap();
        assert_eq!(reply, DEFAULT_REPLY);
        assert_eq!(mock.answer_calls(), 1);
        assert_eq!(mock.routing_calls(), 0);
    }

    #[tokio::test]
    async fn queues_are_independent_per_kind() {
        let mock = MockModelClient::with_answers(vec!["answer".into()]);
        mock.push_routing(MockReply::text("project")).await;

        assert_eq!(mock.complete(request(RequestKind::Routing)).await.unwrap(), "project");
        assert_eq!(mock.complete(request(RequestKind::Answer)).await.unwrap(), "answer");
        assert_eq!(mock.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn rate_limit_is_typed() {
        let mock = MockModelClient::new();
        mock.push_answer(MockReply::RateLimited(Some(Duration::from_secs(7))))
            .await;
        let err = mock.complete(request(RequestKind::Answer)).await.unwrap_err();
        assert_eq!(err.rate_limit_hint(), Some(Duration::from_secs(7)));
    }
}
