// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of the structured strategic-fit payload from a model reply.
//!
//! Parsing never fails: a reply without a usable JSON object yields the
//! [`FitAnalysis::empty`] sentinel.

use folio_core::{FitAnalysis, KanbanCard, KanbanData, SummaryData};
use serde_json::Value;
use tracing::{debug, warn};

/// Phrases that mark a query as a request to compare the portfolio with a role.
const COMPARISON_MARKERS: &[&str] = &[
    "job description",
    "requirements",
    "position",
    "role",
    "hiring",
    "job posting",
    "analyze this",
    "fit analysis",
];

/// Whether the query asks for a structured comparison rather than a general answer.
pub fn is_comparison_request(query: &str) -> bool {
    let lower = query.to_lowercase();
    COMPARISON_MARKERS.iter().any(|m| lower.contains(m))
}

/// Parse the outermost `{...}` span of `reply` into a [`FitAnalysis`].
///
/// `processing_time_secs` and `agent_used` always come from the caller, not
/// from whatever the model wrote into those fields.
pub fn parse_structured_reply(reply: &str, processing_time_secs: f64, agent_used: &str) -> FitAnalysis {
    let Some(object) = extract_object(reply) else {
        warn!("strategic fit reply had no parseable JSON object");
        return FitAnalysis::empty(processing_time_secs, agent_used);
    };

    let kanban = object.get("kanban_data");
    let summary = object.get("summary_data");
    if kanban.is_none() && summary.is_none() {
        warn!("strategic fit reply JSON lacked kanban_data and summary_data");
        return FitAnalysis::empty(processing_time_secs, agent_used);
    }

    let kanban_data = kanban.map(parse_kanban).unwrap_or_default();
    let summary = summary.unwrap_or(&Value::Null);
    let match_percentage = percentage(summary.get("matchPercentage"));

    let match_score = object
        .get("match_score")
        .map(text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{match_percentage}%"));

    let analysis = FitAnalysis {
        summary_data: SummaryData {
            overall_match: field_text(summary, "overallMatch"),
            match_percentage,
            executive_summary: field_text(summary, "executiveSummary"),
            key_strengths: strings(summary.get("keyStrengths")),
            competitive_advantages: strings(summary.get("competitiveAdvantages")),
            interview_highlights: strings(summary.get("interviewHighlights")),
            processing_time: processing_time_secs,
            agent_used: agent_used.to_string(),
        },
        kanban_data,
        match_score,
    };
    debug!(
        technical_skills = analysis.kanban_data.technical_skills.len(),
        match_percentage, "parsed strategic fit analysis"
    );
    analysis
}

fn extract_object(reply: &str) -> Option<serde_json::Map<String, Value>> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&reply[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "strategic fit JSON did not parse");
            None
        }
    }
}

fn parse_kanban(value: &Value) -> KanbanData {
    KanbanData {
        technical_skills: cards(value.get("technicalSkills")),
        relevant_experience: cards(value.get("relevantExperience")),
        project_evidence: cards(value.get("projectEvidence")),
        quantifiable_impact: cards(value.get("quantifiableImpact")),
    }
}

fn cards(value: Option<&Value>) -> Vec<KanbanCard> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .enumerate()
        .map(|(i, item)| {
            let id = field_text(item, "id");
            KanbanCard {
                id: if id.is_empty() { (i + 1).to_string() } else { id },
                title: field_text(item, "title"),
                description: field_text(item, "description"),
                score: field_text(item, "score"),
            }
        })
        .collect()
}

fn strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(text).filter(|s| !s.is_empty()).collect(),
        _ => Vec::new(),
    }
}

fn field_text(value: &Value, key: &str) -> String {
    value.get(key).map(text).unwrap_or_default()
}

/// Strings pass through; numbers and booleans are rendered; anything else is empty.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Accepts `85`, `85.4` or `"85%"`, clamped to 0..=100.
fn percentage(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: &str = "Strategic Fit Agent";

    #[test]
    fn comparison_markers_detected() {
        assert!(is_comparison_request("Please analyze this job posting"));
        assert!(is_comparison_request("What are the REQUIREMENTS you meet?"));
        assert!(!is_comparison_request("What is your strongest skill?"));
    }

    #[test]
    fn parses_payload_embedded_in_prose() {
        let reply = r#"Here is my analysis:
```json
{
  "kanban_data": {
    "technicalSkills": [{"id": 1, "title": "Rust", "description": "Daily use", "score": "Excellent"}],
    "relevantExperience": [],
    "projectEvidence": [{"title": "Search engine", "description": "Built it", "score": "High"}],
    "quantifiableImpact": []
  },
  "summary_data": {
    "overallMatch": "Good Fit",
    "matchPercentage": "82%",
    "executiveSummary": "Strong systems background.",
    "keyStrengths": ["Rust", "Distributed systems"],
    "competitiveAdvantages": [],
    "interviewHighlights": ["Ask about the search engine"],
    "processingTime": "2.3s",
    "agentUsed": "someone else"
  },
  "match_score": "82%"
}
```
Good luck!"#;
        let fit = parse_structured_reply(reply, 1.25, AGENT);
        assert!(!fit.is_failed());
        assert_eq!(fit.kanban_data.technical_skills[0].id, "1");
        assert_eq!(fit.kanban_data.technical_skills[0].title, "Rust");
        assert_eq!(fit.kanban_data.project_evidence[0].id, "1");
        assert_eq!(fit.summary_data.match_percentage, 82);
        assert_eq!(fit.summary_data.processing_time, 1.25);
        assert_eq!(fit.summary_data.agent_used, AGENT);
        assert_eq!(fit.match_score, "82%");
    }

    #[test]
    fn reply_without_json_yields_sentinel() {
        let fit = parse_structured_reply("I think you'd be a great fit!", 0.5, AGENT);
        assert!(fit.is_failed());
        assert!(fit.kanban_data.is_empty());
        assert_eq!(fit.summary_data.match_percentage, 0);
        assert_eq!(fit.match_score, "0%");
    }

    #[test]
    fn malformed_json_yields_sentinel() {
        let fit = parse_structured_reply("{ \"kanban_data\": [ }", 0.5, AGENT);
        assert!(fit.is_failed());
    }

    #[test]
    fn reversed_braces_yield_sentinel() {
        assert!(parse_structured_reply("} nothing {", 0.0, AGENT).is_failed());
    }

    #[test]
    fn unrelated_object_yields_sentinel() {
        assert!(parse_structured_reply(r#"{"answer": "yes"}"#, 0.0, AGENT).is_failed());
    }

    #[test]
    fn percentage_is_clamped_and_score_derived() {
        let fit = parse_structured_reply(
            r#"{"summary_data": {"overallMatch": "Excellent Fit", "matchPercentage": 140}}"#,
            0.0,
            AGENT,
        );
        assert_eq!(fit.summary_data.match_percentage, 100);
        assert_eq!(fit.match_score, "100%");
    }
}
