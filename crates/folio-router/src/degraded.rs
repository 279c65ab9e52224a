// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned answers served when no remote model is configured.

use folio_core::{HandlerId, PortfolioStore, StructuredResult};

const OFFLINE_PREFIX: &str =
    "The AI assistant is running in offline mode, so here is a summary straight from the portfolio.";

const NO_DATA: &str =
    "The AI assistant is running in offline mode and no portfolio data is available yet.";

const SKILL_MARKERS: &[&str] = &["skill", "technolog", "stack", "language", "tool"];
const PROJECT_MARKERS: &[&str] = &["project", "built", "github", "demo", "portfolio"];

/// Static fallback content built once from already-loaded portfolio data.
#[derive(Debug, Clone)]
pub struct DegradedModeResponder {
    profile: String,
    skills: String,
    projects: String,
}

impl DegradedModeResponder {
    pub fn from_store(store: &dyn PortfolioStore) -> Self {
        Self {
            profile: store.profile_summary(),
            skills: store.skills_summary(),
            projects: store.projects_summary(),
        }
    }

    /// Pick a summary by sniffing the query. Never fails, never does I/O.
    pub fn respond(&self, handler: HandlerId, query: &str) -> StructuredResult {
        let lower = query.to_lowercase();
        let mentions = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

        let summary = if mentions(SKILL_MARKERS) {
            &self.skills
        } else if mentions(PROJECT_MARKERS)
            || matches!(handler, HandlerId::Project | HandlerId::Demo)
        {
            &self.projects
        } else {
            &self.profile
        };

        let response = match summary.trim() {
            "" if self.profile.trim().is_empty() => NO_DATA.to_string(),
            "" => format!("{OFFLINE_PREFIX}\n\n{}", self.profile.trim()),
            text => format!("{OFFLINE_PREFIX}\n\n{text}"),
        };

        StructuredResult::text(format!("{}_offline", handler.as_str()), response, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Summaries;

    impl PortfolioStore for Summaries {
        fn profile_summary(&self) -> String {
            "Name: Ada".into()
        }
        fn skills_summary(&self) -> String {
            "Languages: Rust".into()
        }
        fn projects_summary(&self) -> String {
            "- Engine: difference engine".into()
        }
        fn core_competencies_summary(&self) -> String {
            String::new()
        }
        fn soft_skills_summary(&self) -> String {
            String::new()
        }
        fn projects_matching(&self, _keywords: &[&str]) -> Vec<String> {
            Vec::new()
        }
        fn featured_projects(&self) -> Vec<String> {
            Vec::new()
        }
        fn experience_matching(&self, _keywords: &[&str]) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn skills_query_gets_skills_summary() {
        let responder = DegradedModeResponder::from_store(&Summaries);
        let result = responder.respond(HandlerId::Profile, "What skills do you have?");
        assert!(result.response.contains("Languages: Rust"));
        assert_eq!(result.handler_id, "profile_offline");
        assert_eq!(result.processing_time_secs, 0.0);
        assert!(!result.is_error());
    }

    #[test]
    fn project_handler_defaults_to_projects() {
        let responder = DegradedModeResponder::from_store(&Summaries);
        let result = responder.respond(HandlerId::Demo, "anything to look at?");
        assert!(result.response.contains("difference engine"));
        assert_eq!(result.handler_id, "demo_offline");
    }

    #[test]
    fn general_query_gets_profile() {
        let responder = DegradedModeResponder::from_store(&Summaries);
        let result = responder.respond(HandlerId::Career, "hello");
        assert!(result.response.contains("Name: Ada"));
        assert!(matches!(result.render_hint, folio_core::RenderHint::Text { .. }));
    }
}
