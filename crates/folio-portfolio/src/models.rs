// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Portfolio document schema.
//!
//! The top-level document rejects unknown sections; nested records accept
//! only the listed fields.

use serde::{Deserialize, Serialize};

/// The complete portfolio document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioData {
    pub profile: Profile,
    pub education: Education,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: Skills,
    pub publications: Vec<Publication>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Github,
    Linkedin,
    Publications,
    Resume,
    Website,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    #[serde(rename = "type")]
    pub kind: LinkType,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub summary: String,
    pub location: String,
    pub email: String,
    pub highlights: Vec<String>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub degree: String,
    pub university: String,
    /// Graduation year, e.g. `"2021"`.
    pub graduation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default)]
    pub coursework: Vec<String>,
}

/// Situation / task / action / result write-up of a role or project.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Star {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub impact: String,
    pub architecture: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub id: u32,
    pub role: String,
    pub company: String,
    pub duration: String,
    pub location: String,
    pub star: Star,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub competencies: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub github_url: String,
    #[serde(default)]
    pub demo_urls: Vec<String>,
    pub star: Star,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Skills {
    pub languages_and_tools: Vec<String>,
    pub databases: Vec<String>,
    pub ml_and_nlp: Vec<String>,
    pub cloud_and_mlops: Vec<String>,
    pub visualization: Vec<String>,
}

impl Skills {
    /// Categories with their display labels, in presentation order.
    pub fn categories(&self) -> [(&'static str, &[String]); 5] {
        [
            ("Languages & Tools", self.languages_and_tools.as_slice()),
            ("Databases", self.databases.as_slice()),
            ("ML & NLP", self.ml_and_nlp.as_slice()),
            ("Cloud & MLOps", self.cloud_and_mlops.as_slice()),
            ("Visualization", self.visualization.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Publication {
    pub id: u32,
    pub title: String,
    pub outlet: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_project_id: Option<String>,
}
