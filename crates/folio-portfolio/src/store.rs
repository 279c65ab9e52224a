// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`PortfolioStore`] backed by a JSON document on disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use folio_core::{AdapterType, FolioError, HealthStatus, PluginAdapter, PortfolioStore};
use tracing::info;

use crate::models::{Experience, PortfolioData, Project};
use crate::validation::validate_portfolio;

/// Longest field excerpt embedded in prompt context.
const FIELD_CHARS: usize = 200;

/// Longest situation excerpt in the profile summary.
const EXCERPT_CHARS: usize = 100;

/// Most records returned by a keyword match.
const MAX_MATCHES: usize = 5;

/// Read and validate a portfolio document.
pub fn load_portfolio(path: &Path) -> Result<PortfolioData, FolioError> {
    let raw = std::fs::read_to_string(path).map_err(|e| FolioError::Portfolio {
        message: format!("cannot read portfolio file {}", path.display()),
        source: Some(Box::new(e)),
    })?;
    parse_portfolio(&raw).map_err(|err| match err {
        FolioError::Portfolio { message, source } => FolioError::Portfolio {
            message: format!("{}: {message}", path.display()),
            source,
        },
        other => other,
    })
}

/// Parse and validate a portfolio document from a string.
pub fn parse_portfolio(raw: &str) -> Result<PortfolioData, FolioError> {
    let data: PortfolioData = serde_json::from_str(raw).map_err(|e| FolioError::Portfolio {
        message: format!("invalid portfolio JSON: {e}"),
        source: Some(Box::new(e)),
    })?;
    validate_portfolio(&data).map_err(|violations| FolioError::Portfolio {
        message: format!("portfolio validation failed: {}", violations.join("; ")),
        source: None,
    })?;
    Ok(data)
}

/// Portfolio store that keeps the validated document in memory.
///
/// Readers take a cheap snapshot; [`JsonPortfolioStore::reload`] swaps in a
/// new document only if it validates.
pub struct JsonPortfolioStore {
    path: Option<PathBuf>,
    data: RwLock<Arc<PortfolioData>>,
}

impl JsonPortfolioStore {
    /// Load the document at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FolioError> {
        let path = path.into();
        let data = load_portfolio(&path)?;
        info!(
            path = %path.display(),
            projects = data.projects.len(),
            experience = data.experience.len(),
            publications = data.publications.len(),
            "portfolio loaded"
        );
        Ok(Self {
            path: Some(path),
            data: RwLock::new(Arc::new(data)),
        })
    }

    /// Wrap an already-parsed document. Such a store cannot be reloaded.
    pub fn from_data(data: PortfolioData) -> Self {
        Self {
            path: None,
            data: RwLock::new(Arc::new(data)),
        }
    }

    /// Current document.
    pub fn snapshot(&self) -> Arc<PortfolioData> {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Re-read and re-validate the backing file. The old document stays
    /// in place if the new one fails.
    pub fn reload(&self) -> Result<(), FolioError> {
        let Some(path) = self.path.as_ref() else {
            return Err(FolioError::Portfolio {
                message: "portfolio was not loaded from a file".to_string(),
                source: None,
            });
        };
        let fresh = Arc::new(load_portfolio(path)?);
        match self.data.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        info!(path = %path.display(), "portfolio reloaded");
        Ok(())
    }

    /// Project by id.
    pub fn project(&self, id: &str) -> Option<Project> {
        self.snapshot().projects.iter().find(|p| p.id == id).cloned()
    }
}

#[async_trait]
impl PluginAdapter for JsonPortfolioStore {
    fn name(&self) -> &str {
        "json-portfolio"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Portfolio
    }

    /// Degraded when the backing file has gone missing; the loaded
    /// document keeps being served.
    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        match self.path.as_ref() {
            Some(path) if !path.exists() => Ok(HealthStatus::Degraded(format!(
                "portfolio file {} is missing",
                path.display()
            ))),
            _ => Ok(HealthStatus::Healthy),
        }
    }
}

impl PortfolioStore for JsonPortfolioStore {
    fn profile_summary(&self) -> String {
        let data = self.snapshot();
        let profile = &data.profile;
        let mut out = String::new();
        let _ = writeln!(out, "Name: {}", profile.name);
        let _ = writeln!(out, "Title: {}", profile.title);
        let _ = writeln!(out, "Summary: {}", clip(&profile.summary, FIELD_CHARS));
        let _ = writeln!(out, "Location: {}", profile.location);
        let _ = writeln!(
            out,
            "Education: {} from {}",
            data.education.degree, data.education.university
        );

        out.push_str("\nKey Highlights:\n");
        for highlight in &profile.highlights {
            let _ = writeln!(out, "- {}", clip(highlight, FIELD_CHARS));
        }

        out.push_str("\nKey Experience:\n");
        for exp in &data.experience {
            let _ = writeln!(
                out,
                "- {} at {}: {}",
                exp.role,
                exp.company,
                clip(&exp.star.situation, EXCERPT_CHARS)
            );
        }

        let featured: Vec<&Project> = data.projects.iter().filter(|p| p.featured).collect();
        if !featured.is_empty() {
            out.push_str("\nFeatured Projects:\n");
            for project in featured {
                let _ = writeln!(
                    out,
                    "- {}: {}",
                    project.title,
                    clip(&project.star.situation, EXCERPT_CHARS)
                );
            }
        }
        out
    }

    fn skills_summary(&self) -> String {
        let data = self.snapshot();
        data.skills
            .categories()
            .iter()
            .map(|(label, items)| format!("{label}: {}", items.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn projects_summary(&self) -> String {
        let data = self.snapshot();
        data.projects
            .iter()
            .map(|p| {
                format!(
                    "Project: {}\nSituation: {}\nAction: {}\nResult: {}\nImpact: {}\nTechnologies: {}",
                    p.title,
                    clip(&p.star.situation, FIELD_CHARS),
                    clip(&p.star.action, FIELD_CHARS),
                    clip(&p.star.result, FIELD_CHARS),
                    clip(&p.star.impact, FIELD_CHARS),
                    p.technologies.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn core_competencies_summary(&self) -> String {
        grouped_by_role(&self.snapshot().experience, |e| &e.competencies)
    }

    fn soft_skills_summary(&self) -> String {
        grouped_by_role(&self.snapshot().experience, |e| &e.soft_skills)
    }

    fn projects_matching(&self, keywords: &[&str]) -> Vec<String> {
        let data = self.snapshot();
        data.projects
            .iter()
            .filter(|p| {
                matches_any(
                    keywords,
                    [p.title.as_str(), p.star.situation.as_str(), p.star.action.as_str()]
                        .into_iter()
                        .chain(p.technologies.iter().map(String::as_str)),
                )
            })
            .take(MAX_MATCHES)
            .map(describe_project)
            .collect()
    }

    fn featured_projects(&self) -> Vec<String> {
        self.snapshot()
            .projects
            .iter()
            .filter(|p| p.featured)
            .map(describe_project)
            .collect()
    }

    fn experience_matching(&self, keywords: &[&str]) -> Vec<String> {
        let data = self.snapshot();
        data.experience
            .iter()
            .filter(|e| {
                matches_any(
                    keywords,
                    [e.role.as_str(), e.company.as_str(), e.star.situation.as_str(), e.star.action.as_str()]
                        .into_iter()
                        .chain(e.technologies.iter().map(String::as_str)),
                )
            })
            .take(MAX_MATCHES)
            .map(describe_experience)
            .collect()
    }
}

fn matches_any<'a>(keywords: &[&str], fields: impl Iterator<Item = &'a str>) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let haystack = fields.map(str::to_lowercase).collect::<Vec<_>>().join(" ");
    keywords
        .iter()
        .any(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
}

fn describe_project(p: &Project) -> String {
    let mut line = format!(
        "{}: {} (Technologies: {}; GitHub: {})",
        p.title,
        clip(&p.star.result, FIELD_CHARS),
        p.technologies.join(", "),
        p.github_url
    );
    if !p.demo_urls.is_empty() {
        let _ = write!(line, " Demo: {}", p.demo_urls.join(", "));
    }
    line
}

fn describe_experience(e: &Experience) -> String {
    format!(
        "{} at {} ({}): {} Result: {}",
        e.role,
        e.company,
        e.duration,
        clip(&e.star.action, FIELD_CHARS),
        clip(&e.star.result, FIELD_CHARS)
    )
}

fn grouped_by_role(experience: &[Experience], items: impl Fn(&Experience) -> &Vec<String>) -> String {
    let mut out = String::new();
    for exp in experience {
        let list = items(exp);
        if list.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{} at {}:", exp.role, exp.company);
        for item in list {
            let _ = writeln!(out, "- {item}");
        }
    }
    out
}

/// At most `max_chars` characters, with `...` appended when cut.
pub fn clip(s: &str, max_chars: usize) -> String {
    let s = s.trim();
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", s[..idx].trim_end()),
        None => s.to_string(),
    }
}
