// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weighted keyword classification of queries into handler categories.
//!
//! Each category owns a "high" phrase list (weight 1.0) and a "medium" list
//! (weight 0.5). A phrase scores once if it occurs anywhere in the
//! lower-cased query. Pure, no network, no state.

use folio_core::HandlerId;

const HIGH_WEIGHT: f64 = 1.0;
const MEDIUM_WEIGHT: f64 = 0.5;

/// Score at which confidence saturates at 1.0.
const CONFIDENCE_SCALE: f64 = 3.0;

/// Outcome of keyword classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub category: HandlerId,
    /// `min(score / 3, 1)`; zero when nothing matched.
    pub confidence: f64,
    /// Raw weighted score of the winning category.
    pub score: f64,
}

struct CategoryKeywords {
    id: HandlerId,
    high: &'static [&'static str],
    medium: &'static [&'static str],
}

/// Phrase tables, in tie-break priority order.
const CATEGORIES: &[CategoryKeywords] = &[
    CategoryKeywords {
        id: HandlerId::Profile,
        high: &[
            "background",
            "education",
            "about you",
            "who are you",
            "profile",
            "degree",
            "university",
        ],
        medium: &[
            "about",
            "tell me about",
            "skills",
            "introduce",
            "summary",
            "bio",
            "studied",
        ],
    },
    CategoryKeywords {
        id: HandlerId::Project,
        high: &[
            "project",
            "github",
            "implementation",
            "built",
            "source code",
            "repository",
        ],
        medium: &[
            "code",
            "technical",
            "technology",
            "tech stack",
            "architecture",
            "developed",
        ],
    },
    CategoryKeywords {
        id: HandlerId::Career,
        high: &[
            "career",
            "interview",
            "advice",
            "job search",
            "professional development",
        ],
        medium: &[
            "job",
            "development",
            "industry",
            "mentor",
            "growth",
            "resume",
            "experience",
        ],
    },
    CategoryKeywords {
        id: HandlerId::Demo,
        high: &["demo", "walkthrough", "live", "interactive"],
        medium: &["show me", "showcase", "deployed", "try it", "video", "link"],
    },
    CategoryKeywords {
        id: HandlerId::StrategicFit,
        high: &[
            "job description",
            "fit analysis",
            "job posting",
            "strategic fit",
            "analyze this",
            "hiring",
            "requirements",
        ],
        medium: &[
            "fit",
            "match",
            "position",
            "role",
            "candidate",
            "qualifications",
            "strategic",
        ],
    },
];

/// Deterministic keyword scorer over the fixed category set.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query. Ties go to the category declared first.
    pub fn classify(&self, query: &str) -> ClassificationResult {
        let lower = query.to_lowercase();

        let mut best = (HandlerId::DEFAULT, 0.0_f64);
        for category in CATEGORIES {
            let score = score_lowered(&lower, category);
            if score > best.1 {
                best = (category.id, score);
            }
        }

        let (category, score) = best;
        if score == 0.0 {
            return ClassificationResult {
                category: HandlerId::DEFAULT,
                confidence: 0.0,
                score: 0.0,
            };
        }

        ClassificationResult {
            category,
            confidence: (score / CONFIDENCE_SCALE).min(1.0),
            score,
        }
    }

    /// Weighted score of one category for a query.
    pub fn score(&self, query: &str, id: HandlerId) -> f64 {
        let lower = query.to_lowercase();
        CATEGORIES
            .iter()
            .find(|c| c.id == id)
            .map(|c| score_lowered(&lower, c))
            .unwrap_or(0.0)
    }

    /// High-weight phrases of a category.
    pub fn high_phrases(&self, id: HandlerId) -> &'static [&'static str] {
        CATEGORIES
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.high)
            .unwrap_or(&[])
    }
}

fn score_lowered(lower: &str, category: &CategoryKeywords) -> f64 {
    let high = category.high.iter().filter(|p| lower.contains(*p)).count() as f64;
    let medium = category.medium.iter().filter(|p| lower.contains(*p)).count() as f64;
    high * HIGH_WEIGHT + medium * MEDIUM_WEIGHT
}
