//! Generative model providers.
//!
//! Each provider sends a single free-text prompt to a hosted or local model
//! and returns the reply text unchanged. Prompt construction and reply
//! parsing live in [`crate::core`]; this module is transport only.
//!
//! ## Providers
//!
//! - **gemini** (default) - Google Gemini, `GEMINI_API_KEY`
//! - **openai** - OpenAI or compatible APIs, `OPENAI_API_KEY`
//! - **claude** - Anthropic Claude, `ANTHROPIC_API_KEY`
//! - **ollama** - local models, no key required

mod claude;
mod gemini;
mod ollama;
mod openai;

pub use claude::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;

use std::time::Duration;

use async_trait::async_trait;

use crate::core::AiConfig;

/// Trait for generative model providers.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Send a prompt and return the model's text reply.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;

    /// Get the provider name.
    fn name(&self) -> &str;

    /// Get the model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Check if the provider is reachable and configured.
    async fn is_available(&self) -> bool;
}

/// AI error types.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("Unknown AI provider '{0}' (expected gemini, openai, claude or ollama)")]
    UnknownProvider(String),

    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("No response from {0}")]
    NoResponse(&'static str),
}

/// Generation settings shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    /// Upper bound on reply length
    pub max_output_tokens: u32,

    /// Sampling temperature (provider default when unset)
    pub temperature: Option<f32>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { max_output_tokens: 8192, temperature: None, timeout: Duration::from_secs(120) }
    }
}

impl From<&AiConfig> for GenerationOptions {
    fn from(config: &AiConfig) -> Self {
        Self {
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Read a required API key from the environment.
fn api_key_from_env(var: &'static str) -> Result<String, AIError> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(AIError::MissingApiKey(var))
}

/// Turn a non-success HTTP response into an error carrying status and body.
async fn check_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(AIError::ApiError { status, body }.into())
}

/// Create the provider named in the configuration.
pub fn create_provider(config: &AiConfig) -> anyhow::Result<Box<dyn AIProvider>> {
    let options = GenerationOptions::from(config);
    let model = config.model.clone();
    let base_url = config.base_url.clone();

    let provider: Box<dyn AIProvider> = match config.provider.to_ascii_lowercase().as_str() {
        "gemini" | "google" => {
            let mut provider = GeminiProvider::new()?.with_options(options);
            if let Some(model) = model {
                provider = provider.with_model(model);
            }
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            Box::new(provider)
        }
        "openai" => {
            let mut provider = OpenAIProvider::new()?.with_options(options);
            if let Some(model) = model {
                provider = provider.with_model(model);
            }
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            Box::new(provider)
        }
        "claude" | "anthropic" => {
            let mut provider = ClaudeProvider::new()?.with_options(options);
            if let Some(model) = model {
                provider = provider.with_model(model);
            }
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            Box::new(provider)
        }
        "ollama" => {
            let mut provider = OllamaProvider::from_config(&config.ollama).with_options(options);
            if let Some(model) = model {
                provider = provider.with_model(model);
            }
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            Box::new(provider)
        }
        other => return Err(AIError::UnknownProvider(other.to_string()).into()),
    };

    tracing::debug!(provider = provider.name(), model = provider.model(), "model provider ready");
    Ok(provider)
}
