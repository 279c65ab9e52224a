// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading, validation and summary rendering against the bundled sample.

use std::io::Write;

use folio_core::{AdapterType, FolioError, HealthStatus, PluginAdapter, PortfolioStore};
use folio_portfolio::{JsonPortfolioStore, parse_portfolio};

const SAMPLE: &str = include_str!("../../../data/portfolio.json");

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn bundled_sample_loads() {
    let file = write_temp(SAMPLE);
    let store = JsonPortfolioStore::open(file.path()).unwrap();
    let data = store.snapshot();
    assert_eq!(data.profile.name, "Avery Chen");
    assert_eq!(data.projects.len(), 2);
    assert!(store.project("semantic-search").is_some());
    assert!(store.project("missing").is_none());
}

#[test]
fn missing_file_is_a_portfolio_error() {
    let err = JsonPortfolioStore::open("/nonexistent/portfolio.json")
        .err()
        .unwrap();
    assert!(matches!(err, FolioError::Portfolio { .. }));
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let mut doc: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    doc["hobbies"] = serde_json::json!(["climbing"]);
    let err = parse_portfolio(&doc.to_string()).unwrap_err();
    assert!(err.to_string().contains("hobbies"), "{err}");
}

#[test]
fn every_violation_is_reported() {
    let mut doc: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    doc["profile"]["email"] = serde_json::json!("not-an-email");
    doc["education"]["graduation"] = serde_json::json!("21");
    let err = parse_portfolio(&doc.to_string()).unwrap_err().to_string();
    assert!(err.contains("profile.email"), "{err}");
    assert!(err.contains("education.graduation"), "{err}");
}

#[test]
fn profile_summary_includes_identity_and_featured_work() {
    let store = JsonPortfolioStore::from_data(parse_portfolio(SAMPLE).unwrap());
    let summary = store.profile_summary();
    assert!(summary.starts_with("Name: Avery Chen\nTitle: Machine Learning Engineer\n"));
    assert!(summary.contains("Education: M.S. Computer Science from University of Washington"));
    assert!(summary.contains("Featured Projects:\n- Semantic Code Search"));
    assert!(!summary.contains("Demand Forecast Dashboard"));
}

#[test]
fn skills_summary_lists_each_category() {
    let store = JsonPortfolioStore::from_data(parse_portfolio(SAMPLE).unwrap());
    let skills = store.skills_summary();
    assert_eq!(skills.lines().count(), 5);
    assert!(skills.starts_with("Languages & Tools: Python, Rust, SQL, Docker, Git"));
}

#[test]
fn competencies_are_grouped_by_role() {
    let store = JsonPortfolioStore::from_data(parse_portfolio(SAMPLE).unwrap());
    let competencies = store.core_competencies_summary();
    assert!(competencies.contains("Machine Learning Engineer at Northwind Labs:\n- Information retrieval"));
    let soft = store.soft_skills_summary();
    assert!(soft.contains("Data Scientist at Contoso Health:\n- Stakeholder communication"));
}

#[test]
fn keyword_matching_is_case_insensitive() {
    let store = JsonPortfolioStore::from_data(parse_portfolio(SAMPLE).unwrap());
    let projects = store.projects_matching(&["qdrant"]);
    assert_eq!(projects.len(), 1);
    assert!(projects[0].starts_with("Semantic Code Search:"));
    assert!(projects[0].contains("Demo: https://search.avery.example.com"));

    let experience = store.experience_matching(&["AIRFLOW"]);
    assert_eq!(experience.len(), 1);
    assert!(experience[0].starts_with("Data Scientist at Contoso Health"));

    assert!(store.projects_matching(&["cobol"]).is_empty());
    assert!(store.experience_matching(&[]).is_empty());
}

#[test]
fn featured_projects_only_lists_featured() {
    let store = JsonPortfolioStore::from_data(parse_portfolio(SAMPLE).unwrap());
    let featured = store.featured_projects();
    assert_eq!(featured.len(), 1);
    assert!(featured[0].starts_with("Semantic Code Search"));
}

#[test]
fn reload_keeps_old_document_on_failure() {
    let file = write_temp(SAMPLE);
    let store = JsonPortfolioStore::open(file.path()).unwrap();

    std::fs::write(file.path(), "{ not json").unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.snapshot().profile.name, "Avery Chen");

    let mut doc: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    doc["profile"]["name"] = serde_json::json!("Avery Q. Chen");
    std::fs::write(file.path(), doc.to_string()).unwrap();
    store.reload().unwrap();
    assert_eq!(store.snapshot().profile.name, "Avery Q. Chen");
}

#[test]
fn in_memory_store_cannot_reload() {
    let store = JsonPortfolioStore::from_data(parse_portfolio(SAMPLE).unwrap());
    assert!(store.reload().is_err());
}

#[tokio::test]
async fn health_degrades_when_file_disappears() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portfolio.json");
    std::fs::write(&path, SAMPLE).unwrap();
    let store = JsonPortfolioStore::open(&path).unwrap();
    assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    assert_eq!(store.adapter_type(), AdapterType::Portfolio);

    std::fs::remove_file(&path).unwrap();
    assert!(matches!(
        store.health_check().await.unwrap(),
        HealthStatus::Degraded(_)
    ));
    assert_eq!(store.snapshot().profile.name, "Avery Chen");
}
