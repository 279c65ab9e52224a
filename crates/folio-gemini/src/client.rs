// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! authentication, per-request timeouts, and transient error retry.

use std::time::Duration;

use folio_core::FolioError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Delay before the single retry of a transient failure.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for Gemini API communication.
///
/// Manages the API key header, connection pooling, and retry logic for
/// transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// `base_url` is the API root, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(
        api_key: &str,
        model: String,
        base_url: String,
        max_retries: u32,
    ) -> Result<Self, FolioError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| FolioError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FolioError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
            retry_delay: RETRY_DELAY,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the retry delay (for fast tests).
    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Sends a request and returns the parsed response.
    ///
    /// On transient errors (429, 500, 503), retries up to `max_retries`
    /// times after a short delay. `timeout` bounds each attempt.
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
        timeout: Duration,
    ) -> Result<GenerateContentResponse, FolioError> {
        let url = self.endpoint();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generateContent after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&url)
                .timeout(timeout)
                .json(request)
                .send()
                .await
                .map_err(|e| transport_error(e, timeout))?;

            let status = response.status();
            debug!(status = %status, attempt, model = %self.model, "generateContent response received");

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .map_err(|e| transport_error(e, timeout))?;
                return serde_json::from_str(&body).map_err(|e| FolioError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let retry_after_header = retry_after_header(response.headers());
            let body = response.text().await.unwrap_or_default();
            let error = api_error(status, &body, retry_after_header);

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, error = %error, "transient error, will retry");
                last_error = Some(error);
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| FolioError::Provider {
            message: "generateContent failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> FolioError {
    if e.is_timeout() {
        FolioError::Timeout { duration: timeout }
    } else {
        FolioError::Provider {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Map a non-2xx response to a typed error.
fn api_error(status: StatusCode, body: &str, retry_after_header: Option<Duration>) -> FolioError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = retry_after_header.or_else(|| {
            parsed
                .as_ref()
                .and_then(|p| p.error.retry_delay_secs())
                .map(Duration::from_secs)
        });
        let message = parsed
            .map(|p| format!("Gemini API quota exceeded ({}): {}", p.error.status, p.error.message))
            .unwrap_or_else(|| format!("Gemini API returned {status}"));
        return FolioError::RateLimited {
            message,
            retry_after,
        };
    }

    let message = match parsed {
        Some(p) => format!("Gemini API error ({}): {}", p.error.status, p.error.message),
        None => format!("Gemini API returned {status}: {body}"),
    };
    FolioError::Provider {
        message,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Content, GenerationConfig};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/gemini-2.0-flash:generateContent";

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new(
            "test-api-key",
            "gemini-2.0-flash".into(),
            base_url.to_string(),
            1,
        )
        .unwrap()
        .with_retry_delay(Duration::from_millis(10))
    }

    fn test_request() -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Some(Content::system("You are terse.")),
            contents: vec![Content::user("Hello")],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 256,
            },
        }
    }

    fn ok_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 3}
        })
    }

    #[tokio::test]
    async fn generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("Hi there!")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let resp = client
            .generate(&test_request(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(resp.text(), "Hi there!");
        assert_eq!(resp.usage_metadata.unwrap().prompt_token_count, 10);
    }

    #[tokio::test]
    async fn generate_retries_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("After retry")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let resp = client
            .generate(&test_request(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(resp.text(), "After retry");
    }

    #[tokio::test]
    async fn final_429_is_rate_limited_with_retry_info() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED",
                "details": [
                    {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "21s"}
                ]
            }
        });
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate(&test_request(), Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            FolioError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(21)));
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn retry_after_header_wins_over_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "45")
                    .set_body_string("slow down"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate(&test_request(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.rate_limit_hint(), Some(Duration::from_secs(45)));
    }

    #[tokio::test]
    async fn generate_fails_on_400_without_retry() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        });
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate(&test_request(), Duration::from_secs(5))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("INVALID_ARGUMENT"), "got: {msg}");
        assert!(err.rate_limit_hint().is_none());
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ok_body("late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate(&test_request(), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "got: {err:?}");
    }

    #[tokio::test]
    async fn client_sends_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("ok")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.generate(&test_request(), Duration::from_secs(5)).await;
        assert!(result.is_ok(), "headers should match: {result:?}");
    }
}
