// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use folio_core::QueryContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_portfolio::models::{Experience, Profile, Project, Publication, Skills};
use folio_router::CacheStats;

use crate::server::AppState;

/// Request body for POST /api/v1/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Optional caller metadata, e.g. `session_id`.
    #[serde(default)]
    pub context: Option<QueryContext>,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct ServiceBanner {
    pub service: String,
    pub version: String,
    pub owner: String,
    pub title: String,
    pub status: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// `online` with a model client, `degraded` without.
    pub mode: String,
    pub model_configured: bool,
    pub version: String,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

/// Response body for GET /api/v1/resume.
#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub profile: Profile,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: Skills,
    pub publications: Vec<Publication>,
}

/// Response body for GET /api/v1/demo/{project_id}.
#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub project_id: String,
    pub title: String,
    pub github_url: String,
    pub demo_urls: Vec<String>,
}

/// Response body for POST /api/v1/cache/clear.
#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub cleared: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// GET /
pub async fn get_root(State(state): State<AppState>) -> Json<ServiceBanner> {
    Json(ServiceBanner {
        service: "folio".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        owner: state.info.owner.clone(),
        title: state.info.title.clone(),
        status: "running".to_string(),
    })
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_configured = state.router.model_configured();
    Json(HealthResponse {
        status: "healthy".to_string(),
        mode: if model_configured { "online" } else { "degraded" }.to_string(),
        model_configured,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        cache: state.router.cache().map(|c| c.stats()),
    })
}

/// GET /metrics
///
/// Prometheus text format; 404 when the exporter is disabled.
pub async fn get_metrics(State(state): State<AppState>) -> Response {
    match state.health.prometheus_render.as_ref() {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => error_response(StatusCode::NOT_FOUND, "metrics exporter is disabled"),
    }
}

/// POST /api/v1/chat
///
/// Routes the message and returns the structured result. Any well-formed
/// request gets a 200, including failed answers.
pub async fn post_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "rejected chat request body");
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    let result = state
        .router
        .process_query(&body.message, body.context.as_ref())
        .await;
    (StatusCode::OK, Json(result)).into_response()
}

/// GET /api/v1/portfolio-data
pub async fn get_portfolio_data(State(state): State<AppState>) -> Response {
    Json(state.portfolio.snapshot().as_ref().clone()).into_response()
}

/// GET /api/v1/resume
///
/// The portfolio document without the education section.
pub async fn get_resume(State(state): State<AppState>) -> Json<ResumeResponse> {
    let data = state.portfolio.snapshot();
    Json(ResumeResponse {
        profile: data.profile.clone(),
        experience: data.experience.clone(),
        projects: data.projects.clone(),
        skills: data.skills.clone(),
        publications: data.publications.clone(),
    })
}

/// GET /api/v1/profile
pub async fn get_profile(State(state): State<AppState>) -> Response {
    let data = state.portfolio.snapshot();
    Json(serde_json::json!({
        "profile": data.profile,
        "education": data.education,
    }))
    .into_response()
}

/// GET /api/v1/projects
pub async fn get_projects(State(state): State<AppState>) -> Response {
    Json(state.portfolio.snapshot().projects.clone()).into_response()
}

/// GET /api/v1/experience
pub async fn get_experience(State(state): State<AppState>) -> Response {
    Json(state.portfolio.snapshot().experience.clone()).into_response()
}

/// GET /api/v1/skills
pub async fn get_skills(State(state): State<AppState>) -> Response {
    Json(state.portfolio.snapshot().skills.clone()).into_response()
}

/// GET /api/v1/publications
pub async fn get_publications(State(state): State<AppState>) -> Response {
    Json(state.portfolio.snapshot().publications.clone()).into_response()
}

/// GET /api/v1/demo/{project_id}
pub async fn get_demo(State(state): State<AppState>, Path(project_id): Path<String>) -> Response {
    match state.portfolio.project(&project_id) {
        Some(project) => Json(DemoResponse {
            project_id: project.id,
            title: project.title,
            github_url: project.github_url,
            demo_urls: project.demo_urls,
        })
        .into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("no project with id `{project_id}`"),
        ),
    }
}

/// GET /api/v1/cache/stats
pub async fn get_cache_stats(State(state): State<AppState>) -> Response {
    match state.router.cache() {
        Some(cache) => Json(cache.stats()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "response cache is disabled"),
    }
}

/// POST /api/v1/cache/clear
pub async fn post_cache_clear(State(state): State<AppState>) -> Response {
    match state.router.cache() {
        Some(cache) => {
            let cleared = cache.len();
            cache.clear();
            tracing::info!(cleared, "response cache cleared");
            Json(CacheClearResponse { cleared }).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "response cache is disabled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_context_is_optional() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.context.is_none());

        let req: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "context": {"session_id": "s1"}}"#).unwrap();
        assert_eq!(req.context.unwrap()["session_id"], "s1");
    }

    #[test]
    fn health_response_omits_missing_cache() {
        let resp = HealthResponse {
            status: "healthy".into(),
            mode: "degraded".into(),
            model_configured: false,
            version: "0.1.0".into(),
            uptime_secs: 3,
            cache: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["mode"], "degraded");
        assert!(json.get("cache").is_none());
    }
}
