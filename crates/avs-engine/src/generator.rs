//! Text-generation collaborator.
//!
//! The engine only ever sends a prompt and reads back text. Every caller has a
//! deterministic fallback, so a generator is free to fail, time out, or be
//! switched off entirely with [`DisabledGenerator`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use avs_core::AppConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generated {
    pub text: String,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` and return the generated text.
    ///
    /// # Errors
    ///
    /// Any [`GenerationError`]; callers treat every variant the same way.
    async fn generate(&self, prompt: &str) -> Result<Generated, GenerationError>;
}

/// Run `generate` under `timeout`, rejecting blank output.
///
/// # Errors
///
/// [`GenerationError::Timeout`] when the deadline passes, [`GenerationError::Empty`]
/// for whitespace-only text, or whatever the generator itself returned.
pub async fn generate_with_timeout(
    generator: &dyn TextGenerator,
    prompt: &str,
    timeout: Duration,
) -> Result<String, GenerationError> {
    let generated = tokio::time::timeout(timeout, generator.generate(prompt))
        .await
        .map_err(|_| GenerationError::Timeout(timeout.as_millis()))??;

    let text = generated.text.trim();
    if text.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(text.to_string())
}

/// Generator used when no endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Generated, GenerationError> {
        Err(GenerationError::Disabled)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// JSON-over-HTTP generator: `POST <base>/generate` with `{ model, prompt }`,
/// expecting `{ text }` back.
pub struct HttpTextGenerator {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for HttpTextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTextGenerator")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl HttpTextGenerator {
    /// Build a client for the endpoint rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("avs/0.1 (visibility-analytics)")
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/generate", base_url.trim_end_matches('/')),
            model: model.to_owned(),
            api_key: api_key.map(str::to_owned),
        })
    }
}

/// Generator described by `config`: HTTP when a URL is set, disabled otherwise.
///
/// # Errors
///
/// Returns [`GenerationError::Http`] if the HTTP client cannot be constructed.
pub fn generator_from_config(
    config: &AppConfig,
) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    match &config.generator_url {
        Some(url) => {
            tracing::info!(url = %url, model = %config.generator_model, "text generation enabled");
            Ok(Arc::new(HttpTextGenerator::new(
                url,
                &config.generator_model,
                config.generator_api_key.as_deref(),
                config.generator_timeout_secs,
            )?))
        }
        None => {
            tracing::info!("AVS_GENERATOR_URL not set; generated text will use fallbacks");
            Ok(Arc::new(DisabledGenerator))
        }
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generated, GenerationError> {
        let mut request = self.client.post(&self.url).json(&GenerateRequest {
            model: &self.model,
            prompt,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body: Generated = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(format!("generate response: {e}")))?;
        Ok(body)
    }
}
