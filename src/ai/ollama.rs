//! Ollama local LLM integration.
//!
//! Implements the AIProvider trait for Ollama (local LLM).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_status, AIError, AIProvider, GenerationOptions};
use crate::core::OllamaConfig;

/// Ollama API provider for local LLM.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    options: GenerationOptions,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses localhost:11434 by default.
    pub fn new() -> Self {
        Self::from_config(&OllamaConfig::default())
    }

    /// Create from config, letting OLLAMA_HOST and OLLAMA_MODEL override it.
    pub fn from_config(config: &OllamaConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: std::env::var("OLLAMA_HOST").unwrap_or_else(|_| config.base_url.clone()),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| config.model.clone()),
            options: GenerationOptions::default(),
        }
    }

    /// Create with a specific base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set generation options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    fn build_request(&self, prompt: &str) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                num_predict: self.options.max_output_tokens,
                temperature: self.options.temperature,
            },
        }
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let request = self.build_request(prompt);

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url.trim_end_matches('/')))
            .timeout(self.options.timeout)
            .json(&request)
            .send()
            .await?;

        let response: OllamaResponse = check_status(response).await?.json().await?;
        if response.response.is_empty() {
            return Err(AIError::NoResponse("Ollama").into());
        }
        Ok(response.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        // Try to reach the Ollama API
        let result = self
            .client
            .get(format!("{}/api/tags", self.base_url.trim_end_matches('/')))
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await;

        result.is_ok_and(|r| r.status().is_success())
    }
}

/// Ollama API request structure.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}
