// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The built-in handler set: one system prompt and context assembler per
//! category.

use folio_core::{HandlerId, PortfolioStore, QueryContext};
use serde_json::Value;

use crate::handler::{HandlerConfig, PostProcess};

/// Words too common to be useful when matching portfolio records.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "you", "your", "are", "was", "were", "what", "which", "who", "how",
    "why", "when", "where", "can", "could", "would", "should", "have", "has", "had", "with",
    "about", "tell", "me", "any", "this", "that", "these", "those", "from", "into", "some",
    "did", "does", "there", "their", "please", "show", "give", "like", "work", "worked",
];

const SKILL_MARKERS: &[&str] = &["skill", "technolog", "stack", "language", "tool"];

/// Build the five handler configurations from the loaded portfolio.
///
/// Prompts are composed once here; they are not rebuilt when the portfolio
/// is reloaded.
pub fn builtin_handlers(store: &dyn PortfolioStore, owner: &str) -> Vec<HandlerConfig> {
    HandlerId::ALL
        .into_iter()
        .map(|id| match id {
            HandlerId::Profile => HandlerConfig {
                id,
                system_prompt: profile_prompt(store, owner),
                assembler: assemble_profile,
                post_process: PostProcess::Text,
            },
            HandlerId::Project => HandlerConfig {
                id,
                system_prompt: project_prompt(store, owner),
                assembler: assemble_project,
                post_process: PostProcess::ProjectInfo,
            },
            HandlerId::Career => HandlerConfig {
                id,
                system_prompt: career_prompt(owner),
                assembler: assemble_career,
                post_process: PostProcess::Text,
            },
            HandlerId::Demo => HandlerConfig {
                id,
                system_prompt: demo_prompt(owner),
                assembler: assemble_demo,
                post_process: PostProcess::Text,
            },
            HandlerId::StrategicFit => HandlerConfig {
                id,
                system_prompt: strategic_fit_prompt(store, owner),
                assembler: assemble_strategic_fit,
                post_process: PostProcess::StrategicFit,
            },
        })
        .collect()
}

/// Prompt for the one-word routing verification call.
pub fn routing_prompt(query: &str) -> String {
    format!(
        "Route the user query below to exactly one portfolio assistant.\n\n\
         Query: \"{query}\"\n\n\
         Assistants:\n\
         - profile: personal background, education, skills, \"about me\"\n\
         - project: projects, technical implementations, code\n\
         - career: career advice, professional development, industry insight\n\
         - demo: live demonstrations, interactive walkthroughs\n\
         - strategic_fit: job descriptions, requirement matching, fit assessment\n\n\
         Reply with only the assistant name: profile, project, career, demo, or strategic_fit."
    )
}

fn profile_prompt(store: &dyn PortfolioStore, owner: &str) -> String {
    format!(
        "You are the Profile Agent of {owner}'s portfolio.\n\
         Answer questions about background, education, skills and professional summary.\n\n\
         {profile}\n\n\
         Skills:\n{skills}\n\n\
         Use the concrete details above. Stay conversational and professional, and keep \
         answers to two to four sentences unless the user asks for more.",
        profile = store.profile_summary(),
        skills = store.skills_summary(),
    )
}

fn project_prompt(store: &dyn PortfolioStore, owner: &str) -> String {
    format!(
        "You are the Project Agent of {owner}'s portfolio.\n\
         Explain projects, the technologies behind them and what they achieved.\n\n\
         Projects:\n{projects}\n\n\
         Name the exact technologies and metrics listed above. Be technical but accessible, \
         and stay on the projects the user is asking about.",
        projects = store.projects_summary(),
    )
}

fn career_prompt(owner: &str) -> String {
    format!(
        "You are the Career Agent of {owner}'s portfolio.\n\
         Give practical career guidance: AI/ML career paths, industry trends, technical \
         interview preparation, networking and skill roadmaps.\n\n\
         Draw on {owner}'s experience in the context when it is relevant. Be supportive, \
         concrete and encouraging."
    )
}

fn demo_prompt(owner: &str) -> String {
    format!(
        "You are the Demo Agent of {owner}'s portfolio.\n\
         Guide visitors through live project demos and technical walkthroughs.\n\n\
         Explain how to reach each demo, what to try first and the technical context \
         behind it. Only mention demo links that appear in the context."
    )
}

fn strategic_fit_prompt(store: &dyn PortfolioStore, owner: &str) -> String {
    format!(
        "You are the Strategic Fit Agent of {owner}'s portfolio.\n\
         Compare job requirements against the candidate's record.\n\n\
         Candidate profile:\n{profile}\n\n\
         Projects:\n{projects}\n\n\
         Skills:\n{skills}\n\n\
         Core competencies:\n{competencies}\n\n\
         Soft skills:\n{soft_skills}\n\n\
         When given a job description, reply with a single JSON object of this shape:\n\
         {{\n  \"kanban_data\": {{\n    \
         \"technicalSkills\": [{{\"id\": \"1\", \"title\": \"...\", \"description\": \"...\", \"score\": \"Excellent|High|Strong|Good|Moderate\"}}],\n    \
         \"relevantExperience\": [...],\n    \
         \"projectEvidence\": [...],\n    \
         \"quantifiableImpact\": [...]\n  }},\n  \
         \"summary_data\": {{\n    \
         \"overallMatch\": \"Excellent Fit|Good Fit|Partial Fit\",\n    \
         \"matchPercentage\": 85,\n    \
         \"executiveSummary\": \"two or three sentences for a recruiter\",\n    \
         \"keyStrengths\": [\"...\"],\n    \
         \"competitiveAdvantages\": [\"...\"],\n    \
         \"interviewHighlights\": [\"...\"]\n  }},\n  \
         \"match_score\": \"85%\"\n}}\n\n\
         Cite only projects, technologies and results that appear above. For any other \
         question, answer in plain prose.",
        profile = store.profile_summary(),
        projects = store.projects_summary(),
        skills = store.skills_summary(),
        competencies = store.core_competencies_summary(),
        soft_skills = store.soft_skills_summary(),
    )
}

/// Lower-cased content words of a query, deduplicated, in order of appearance.
pub fn query_keywords(query: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in query
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(w))
    {
        if !words.iter().any(|w| w == word) {
            words.push(word.to_string());
        }
    }
    words
}

fn insert_list(ctx: &mut QueryContext, key: &str, items: Vec<String>) {
    if !items.is_empty() {
        ctx.insert(
            key.to_string(),
            Value::Array(items.into_iter().map(Value::String).collect()),
        );
    }
}

fn with_keywords<T>(query: &str, f: impl FnOnce(&[&str]) -> T) -> T {
    let owned = query_keywords(query);
    let keywords: Vec<&str> = owned.iter().map(String::as_str).collect();
    f(&keywords)
}

fn assemble_profile(query: &str, store: &dyn PortfolioStore) -> QueryContext {
    let mut ctx = QueryContext::new();
    let lower = query.to_lowercase();
    if SKILL_MARKERS.iter().any(|m| lower.contains(m)) {
        ctx.insert("skills".to_string(), Value::String(store.skills_summary()));
    }
    insert_list(
        &mut ctx,
        "relevant_experience",
        with_keywords(query, |k| store.experience_matching(k)),
    );
    ctx
}

fn assemble_project(query: &str, store: &dyn PortfolioStore) -> QueryContext {
    let mut ctx = QueryContext::new();
    let matching = with_keywords(query, |k| store.projects_matching(k));
    if matching.is_empty() {
        insert_list(&mut ctx, "featured_projects", store.featured_projects());
    } else {
        insert_list(&mut ctx, "relevant_projects", matching);
    }
    ctx
}

fn assemble_career(query: &str, store: &dyn PortfolioStore) -> QueryContext {
    let mut ctx = QueryContext::new();
    insert_list(
        &mut ctx,
        "relevant_experience",
        with_keywords(query, |k| store.experience_matching(k)),
    );
    ctx
}

fn assemble_demo(_query: &str, store: &dyn PortfolioStore) -> QueryContext {
    let mut ctx = QueryContext::new();
    insert_list(&mut ctx, "featured_projects", store.featured_projects());
    ctx
}

fn assemble_strategic_fit(query: &str, store: &dyn PortfolioStore) -> QueryContext {
    let mut ctx = QueryContext::new();
    let owned = query_keywords(query);
    let keywords: Vec<&str> = owned.iter().map(String::as_str).collect();
    insert_list(&mut ctx, "relevant_projects", store.projects_matching(&keywords));
    insert_list(
        &mut ctx,
        "relevant_experience",
        store.experience_matching(&keywords),
    );
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_drop_stopwords_and_short_words() {
        assert_eq!(
            query_keywords("What did you build with Rust and C++ at Acme?"),
            vec!["build", "rust", "c++", "acme"]
        );
    }

    #[test]
    fn keywords_are_deduplicated() {
        assert_eq!(query_keywords("rust RUST Rust"), vec!["rust"]);
    }

    #[test]
    fn routing_prompt_lists_every_category() {
        let prompt = routing_prompt("hello");
        for id in HandlerId::ALL {
            assert!(prompt.contains(id.as_str()), "missing {id}");
        }
        assert!(prompt.contains("Query: \"hello\""));
    }
}
