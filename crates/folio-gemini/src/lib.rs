// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini model client for folio.
//!
//! This crate implements [`ModelClient`] for the Gemini `generateContent`
//! API. Routing and answer calls differ only in sampling temperature.

pub mod client;
pub mod types;

use async_trait::async_trait;
use folio_config::FolioConfig;
use folio_core::{
    AdapterType, CompletionRequest, FolioError, HealthStatus, ModelClient, PluginAdapter,
    RequestKind,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, GenerationConfig};

/// Gemini provider implementing [`ModelClient`].
pub struct GeminiProvider {
    client: GeminiClient,
    answer_temperature: f32,
    routing_temperature: f32,
    max_output_tokens: u32,
}

impl GeminiProvider {
    /// Creates a provider from configuration.
    ///
    /// Returns `Ok(None)` when no API key is configured; the service then
    /// runs in degraded mode. The `GOOGLE_API_KEY` fallback has already been
    /// applied by the config loader.
    pub fn from_config(config: &FolioConfig) -> Result<Option<Self>, FolioError> {
        let Some(api_key) = config
            .model
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        else {
            info!("no model API key configured");
            return Ok(None);
        };

        let client = GeminiClient::new(
            api_key,
            config.model.model.clone(),
            config.model.base_url.clone(),
            config.model.max_retries,
        )?;

        info!(model = %config.model.model, "Gemini provider initialized");

        Ok(Some(Self {
            client,
            answer_temperature: config.model.answer_temperature,
            routing_temperature: config.model.routing_temperature,
            max_output_tokens: config.model.max_output_tokens,
        }))
    }

    fn to_api_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let temperature = match request.kind {
            RequestKind::Routing => self.routing_temperature,
            RequestKind::Answer => self.answer_temperature,
        };
        GenerateContentRequest {
            system_instruction: (!request.system_prompt.is_empty())
                .then(|| Content::system(request.system_prompt.clone())),
            contents: vec![Content::user(request.user_message.clone())],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, FolioError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ModelClient for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, FolioError> {
        let api_request = self.to_api_request(&request);
        let response = self.client.generate(&api_request, request.timeout).await?;
        let text = response.text();
        debug!(
            kind = %request.kind,
            model = self.client.model(),
            chars = text.len(),
            finish_reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none"),
            "completion received"
        );
        Ok(text)
    }
}
