// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only access to the portfolio owner's records.

/// Textual views over the portfolio, used to build model context and
/// degraded-mode answers.
///
/// Every method is infallible: the store is loaded and validated up front,
/// and missing sections render as empty strings or lists.
pub trait PortfolioStore: Send + Sync {
    /// Name, title, contact line and bio.
    fn profile_summary(&self) -> String;

    /// Skill names grouped by category.
    fn skills_summary(&self) -> String;

    /// One line per project with its title and truncated description.
    fn projects_summary(&self) -> String;

    /// Core competency areas with their evidence.
    fn core_competencies_summary(&self) -> String;

    /// Soft skills with a short description each.
    fn soft_skills_summary(&self) -> String;

    /// Projects whose title, description or technologies mention any keyword.
    fn projects_matching(&self, keywords: &[&str]) -> Vec<String>;

    /// Projects flagged as featured.
    fn featured_projects(&self) -> Vec<String>;

    /// Experience entries whose role, company or responsibilities mention any keyword.
    fn experience_matching(&self, keywords: &[&str]) -> Vec<String>;
}
