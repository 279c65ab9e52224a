// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field constraints checked after the document deserializes.
//!
//! Every violation is collected so one load reports them all.

use crate::models::PortfolioData;

/// Validate a parsed portfolio, returning every violation found.
pub fn validate_portfolio(data: &PortfolioData) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut require = |ok: bool, message: String| {
        if !ok {
            errors.push(message);
        }
    };

    let profile = &data.profile;
    require(!blank(&profile.name), "profile.name must not be empty".into());
    require(!blank(&profile.title), "profile.title must not be empty".into());
    require(!blank(&profile.summary), "profile.summary must not be empty".into());
    require(
        is_email(&profile.email),
        format!("profile.email `{}` is not a valid address", profile.email),
    );
    require(
        !profile.highlights.is_empty(),
        "profile.highlights must list at least one entry".into(),
    );
    require(
        !profile.links.is_empty(),
        "profile.links must list at least one entry".into(),
    );

    let education = &data.education;
    require(!blank(&education.degree), "education.degree must not be empty".into());
    require(
        !blank(&education.university),
        "education.university must not be empty".into(),
    );
    require(
        education.graduation.len() == 4 && education.graduation.chars().all(|c| c.is_ascii_digit()),
        format!(
            "education.graduation `{}` must be a four-digit year",
            education.graduation
        ),
    );

    require(
        !data.experience.is_empty(),
        "experience must list at least one entry".into(),
    );
    for (i, exp) in data.experience.iter().enumerate() {
        require(exp.id > 0, format!("experience[{i}].id must be positive"));
        require(!blank(&exp.role), format!("experience[{i}].role must not be empty"));
        require(
            !blank(&exp.company),
            format!("experience[{i}].company must not be empty"),
        );
        require(
            !exp.technologies.is_empty(),
            format!("experience[{i}].technologies must list at least one entry"),
        );
    }

    require(
        !data.projects.is_empty(),
        "projects must list at least one entry".into(),
    );
    let mut seen_ids = std::collections::HashSet::new();
    for (i, project) in data.projects.iter().enumerate() {
        require(!blank(&project.id), format!("projects[{i}].id must not be empty"));
        require(
            seen_ids.insert(project.id.as_str()),
            format!("projects[{i}].id `{}` is duplicated", project.id),
        );
        require(
            !blank(&project.title),
            format!("projects[{i}].title must not be empty"),
        );
        require(
            !project.technologies.is_empty(),
            format!("projects[{i}].technologies must list at least one entry"),
        );
    }

    require(
        !data.publications.is_empty(),
        "publications must list at least one entry".into(),
    );
    for (i, publication) in data.publications.iter().enumerate() {
        require(publication.id > 0, format!("publications[{i}].id must be positive"));
        require(
            !blank(&publication.title),
            format!("publications[{i}].title must not be empty"),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// `local@domain.tld` with no extra `@`.
fn is_email(s: &str) -> bool {
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        _ => false,
    }
}
