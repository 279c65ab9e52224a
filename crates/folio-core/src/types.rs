// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the router, handlers, gateway and adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Optional caller-supplied metadata attached to a query.
pub type QueryContext = serde_json::Map<String, serde_json::Value>;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Model,
    Portfolio,
    Telemetry,
}

/// The closed set of handler categories a query can be routed to.
///
/// Declaration order is the routing priority order: when two categories
/// score the same, the one declared first wins.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum HandlerId {
    Profile,
    Project,
    Career,
    Demo,
    StrategicFit,
}

impl HandlerId {
    /// All categories in priority order.
    pub const ALL: [HandlerId; 5] = [
        HandlerId::Profile,
        HandlerId::Project,
        HandlerId::Career,
        HandlerId::Demo,
        HandlerId::StrategicFit,
    ];

    /// Category used when nothing else matches.
    pub const DEFAULT: HandlerId = HandlerId::Profile;

    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerId::Profile => "profile",
            HandlerId::Project => "project",
            HandlerId::Career => "career",
            HandlerId::Demo => "demo",
            HandlerId::StrategicFit => "strategic_fit",
        }
    }

    /// Human-readable name reported to clients.
    pub fn display_name(&self) -> &'static str {
        match self {
            HandlerId::Profile => "Profile Agent",
            HandlerId::Project => "Project Agent",
            HandlerId::Career => "Career Agent",
            HandlerId::Demo => "Demo Agent",
            HandlerId::StrategicFit => "Strategic Fit Agent",
        }
    }
}

/// Category of a failed [`StructuredResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The query was rejected before routing.
    Validation,
    /// The remote model reported quota exhaustion.
    RateLimited,
    /// The remote model answered with nothing.
    EmptyReply,
    /// The remote model failed or timed out.
    Upstream,
    /// Something inside the router went wrong.
    Internal,
}

/// Error details carried by a failed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl ResultError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after: Duration) -> Self {
        Self {
            kind: ErrorKind::RateLimited,
            message: message.into(),
            retry_after_secs: Some(retry_after.as_secs()),
        }
    }
}

/// One card on the strategic-fit kanban board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanCard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: String,
}

/// Evidence columns of a strategic-fit analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanData {
    #[serde(default)]
    pub technical_skills: Vec<KanbanCard>,
    #[serde(default)]
    pub relevant_experience: Vec<KanbanCard>,
    #[serde(default)]
    pub project_evidence: Vec<KanbanCard>,
    #[serde(default)]
    pub quantifiable_impact: Vec<KanbanCard>,
}

impl KanbanData {
    pub fn is_empty(&self) -> bool {
        self.technical_skills.is_empty()
            && self.relevant_experience.is_empty()
            && self.project_evidence.is_empty()
            && self.quantifiable_impact.is_empty()
    }
}

/// Headline section of a strategic-fit analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryData {
    #[serde(default)]
    pub overall_match: String,
    #[serde(default)]
    pub match_percentage: u8,
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default)]
    pub competitive_advantages: Vec<String>,
    #[serde(default)]
    pub interview_highlights: Vec<String>,
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub agent_used: String,
}

/// Structured payload produced when comparing the portfolio against a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitAnalysis {
    pub kanban_data: KanbanData,
    pub summary_data: SummaryData,
    pub match_score: String,
}

impl FitAnalysis {
    pub const FAILED_HEADLINE: &'static str = "Analysis Failed";

    /// Sentinel returned when the model reply could not be parsed.
    pub fn empty(processing_time_secs: f64, agent_used: &str) -> Self {
        Self {
            kanban_data: KanbanData::default(),
            summary_data: SummaryData {
                overall_match: Self::FAILED_HEADLINE.to_string(),
                match_percentage: 0,
                executive_summary: "Unable to analyze the provided job description.".to_string(),
                key_strengths: Vec::new(),
                competitive_advantages: Vec::new(),
                interview_highlights: Vec::new(),
                processing_time: processing_time_secs,
                agent_used: agent_used.to_string(),
            },
            match_score: "0%".to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.summary_data.overall_match == Self::FAILED_HEADLINE
            && self.summary_data.match_percentage == 0
            && self.kanban_data.is_empty()
    }
}

/// Presentation hint telling the client how to display a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderHint {
    Text { content: String },
    Error { message: String },
    ProjectInfo { content: String },
    StrategicAnalysis { content: String },
    StrategicFitAnalysis(FitAnalysis),
}

impl RenderHint {
    pub fn is_error(&self) -> bool {
        matches!(self, RenderHint::Error { .. })
    }
}

/// The only response shape callers ever see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    pub response: String,
    #[serde(rename = "viewport_content")]
    pub render_hint: RenderHint,
    #[serde(rename = "agent_used")]
    pub handler_id: String,
    #[serde(rename = "processing_time")]
    pub processing_time_secs: f64,
    #[serde(default)]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routed_to: Option<HandlerId>,
    #[serde(
        default,
        rename = "total_processing_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_processing_time_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResultError>,
}

impl StructuredResult {
    /// A successful plain-text result.
    pub fn text(handler_id: impl Into<String>, response: String, processing_time_secs: f64) -> Self {
        Self {
            render_hint: RenderHint::Text {
                content: response.clone(),
            },
            response,
            handler_id: handler_id.into(),
            processing_time_secs,
            cached: false,
            routed_to: None,
            total_processing_time_secs: None,
            error: None,
        }
    }

    /// A failed result with an error render hint and a user-facing message.
    pub fn failure(
        handler_id: impl Into<String>,
        response: impl Into<String>,
        error: ResultError,
        processing_time_secs: f64,
    ) -> Self {
        let response = response.into();
        Self {
            render_hint: RenderHint::Error {
                message: response.clone(),
            },
            response,
            handler_id: handler_id.into(),
            processing_time_secs,
            cached: false,
            routed_to: None,
            total_processing_time_secs: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Distinguishes short routing calls from full answer generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    Routing,
    Answer,
}

/// A single-shot completion request to the remote model.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub kind: RequestKind,
    pub system_prompt: String,
    pub user_message: String,
    pub timeout: Duration,
}

/// Record emitted once per handled query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEvent {
    pub session_id: String,
    pub query_text: String,
    pub handler_id: String,
    pub latency: Duration,
    pub cached: bool,
    pub errored: bool,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn handler_ids_parse_case_insensitively() {
        assert_eq!(HandlerId::from_str("project").unwrap(), HandlerId::Project);
        assert_eq!(
            HandlerId::from_str("STRATEGIC_FIT").unwrap(),
            HandlerId::StrategicFit
        );
        assert!(HandlerId::from_str("weather").is_err());
    }

    #[test]
    fn handler_id_strings_agree() {
        for id in HandlerId::ALL {
            assert_eq!(id.to_string(), id.as_str());
        }
    }

    #[test]
    fn result_serializes_with_client_field_names() {
        let mut result = StructuredResult::text("profile", "hello".into(), 0.25);
        result.routed_to = Some(HandlerId::Profile);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["agent_used"], "profile");
        assert_eq!(json["viewport_content"]["type"], "text");
        assert_eq!(json["viewport_content"]["content"], "hello");
        assert_eq!(json["routed_to"], "profile");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn fit_hint_flattens_payload_under_type_tag() {
        let hint = RenderHint::StrategicFitAnalysis(FitAnalysis::empty(1.0, "Strategic Fit Agent"));
        let json = serde_json::to_value(&hint).unwrap();
        assert_eq!(json["type"], "strategic_fit_analysis");
        assert_eq!(json["summary_data"]["overallMatch"], "Analysis Failed");
        assert_eq!(json["match_score"], "0%");
    }

    #[test]
    fn empty_fit_analysis_is_failed() {
        assert!(FitAnalysis::empty(0.0, "x").is_failed());
    }

    #[test]
    fn failure_carries_error_hint() {
        let result = StructuredResult::failure(
            "career",
            "try later",
            ResultError::rate_limited("quota", Duration::from_secs(60)),
            0.1,
        );
        assert!(result.is_error());
        assert!(result.render_hint.is_error());
        assert_eq!(result.error.unwrap().retry_after_secs, Some(60));
    }
}
