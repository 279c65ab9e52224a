// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini `generateContent` request/response types.

use serde::{Deserialize, Serialize};

// --- Request types ---

/// A request to the `generateContent` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// System instruction (role is omitted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Conversation turns; a single user turn for folio.
    pub contents: Vec<Content>,

    pub generation_config: GenerationConfig,
}

/// A turn of content made of text parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// A content part. Only text parts are produced or read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Sampling parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

// --- Response types ---

/// Successful `generateContent` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, empty if there is none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

// --- Error types ---

/// Error envelope returned on non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    /// Canonical status, e.g. `RESOURCE_EXHAUSTED`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

impl ApiErrorDetail {
    /// `retryDelay` of the first `RetryInfo` detail, in whole seconds.
    pub fn retry_delay_secs(&self) -> Option<u64> {
        self.details
            .iter()
            .filter(|d| {
                d.get("@type")
                    .and_then(|t| t.as_str())
                    .is_some_and(|t| t.ends_with("RetryInfo"))
            })
            .find_map(|d| d.get("retryDelay").and_then(|v| v.as_str()))
            .and_then(parse_duration_secs)
    }
}

/// Parse a protobuf duration string such as `"17s"` or `"1.5s"`, rounding up.
fn parse_duration_secs(raw: &str) -> Option<u64> {
    let secs: f64 = raw.trim().strip_suffix('s')?.parse().ok()?;
    (secs.is_finite() && secs >= 0.0).then(|| secs.ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_camel_case() {
        let req = GenerateContentRequest {
            system_instruction: Some(Content::system("be brief")),
            contents: vec![Content::user("hi")],
            generation_config: GenerationConfig {
                temperature: 0.1,
                max_output_tokens: 64,
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 64);
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(resp.text(), "Hello, world");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        let resp: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"promptFeedback": {}})).unwrap();
        assert_eq!(resp.text(), "");
    }

    #[test]
    fn retry_delay_is_read_from_retry_info() {
        let err: ApiErrorResponse = serde_json::from_value(serde_json::json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED",
                "details": [
                    {"@type": "type.googleapis.com/google.rpc.QuotaFailure"},
                    {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "16.2s"}
                ]
            }
        }))
        .unwrap();
        assert_eq!(err.error.retry_delay_secs(), Some(17));
    }

    #[test]
    fn duration_strings_parse() {
        assert_eq!(parse_duration_secs("30s"), Some(30));
        assert_eq!(parse_duration_secs("30"), None);
        assert_eq!(parse_duration_secs("-1s"), None);
    }
}
