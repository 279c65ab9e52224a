// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot `folio chat` and `folio classify` commands.

use std::sync::Arc;

use folio_config::FolioConfig;
use folio_core::{FolioError, NoopTelemetry, QueryContext, StructuredResult};
use folio_router::{ClassificationResult, KeywordClassifier};

use crate::serve::{build_components, model_client};

/// Runs `folio chat`: answer one query and print the result as JSON.
pub async fn run_chat(
    config: FolioConfig,
    message: &str,
    context: Option<&str>,
) -> Result<(), FolioError> {
    crate::init_tracing(&config.agent.log_level);

    let context = context.map(parse_context).transpose()?;
    let result = answer(&config, message, context.as_ref()).await?;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| FolioError::Internal(format!("failed to encode result: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Runs `folio classify`: keyword classification only, no network.
pub fn run_classify(message: &str) {
    println!("{}", format_classification(&KeywordClassifier::new().classify(message)));
}

async fn answer(
    config: &FolioConfig,
    message: &str,
    context: Option<&QueryContext>,
) -> Result<StructuredResult, FolioError> {
    let model = model_client(config).await?;
    let components = build_components(config, Arc::new(NoopTelemetry), model)?;
    Ok(components.router.process_query(message, context).await)
}

/// `--context` must be a JSON object.
fn parse_context(raw: &str) -> Result<QueryContext, FolioError> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(FolioError::Validation(
            "--context must be a JSON object".to_string(),
        )),
        Err(e) => Err(FolioError::Validation(format!("--context is not valid JSON: {e}"))),
    }
}

fn format_classification(result: &ClassificationResult) -> String {
    format!(
        "category:   {} ({})\nconfidence: {:.2}\nscore:      {:.1}",
        result.category.as_str(),
        result.category.display_name(),
        result.confidence,
        result.score
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serve::offline_config;
    use folio_core::HandlerId;

    #[test]
    fn context_must_be_an_object() {
        let ctx = parse_context(r#"{"session_id": "cli"}"#).unwrap();
        assert_eq!(ctx["session_id"], "cli");

        assert!(matches!(parse_context("[1, 2]"), Err(FolioError::Validation(_))));
        assert!(matches!(parse_context("{oops"), Err(FolioError::Validation(_))));
    }

    #[test]
    fn classification_output_names_category() {
        let result = KeywordClassifier::new().classify("What projects have you built on GitHub?");
        assert_eq!(result.category, HandlerId::Project);
        let text = format_classification(&result);
        assert!(text.starts_with("category:   project (Project Agent)"), "{text}");
        assert!(text.contains("confidence: "));
    }

    #[test]
    fn unmatched_message_reports_default_category() {
        let text = format_classification(&KeywordClassifier::new().classify("hello"));
        assert!(text.contains("profile"));
        assert!(text.contains("confidence: 0.00"));
    }

    #[tokio::test]
    async fn offline_chat_answers_from_portfolio() {
        let result = answer(&offline_config(), "Tell me about your education", None)
            .await
            .unwrap();
        assert!(result.error.is_none());
        assert_eq!(result.handler_id, "profile_offline");
        assert!(result.response.contains("University of Washington"), "{}", result.response);
    }
}
