//! OpenAI API integration.
//!
//! Implements the AIProvider trait for OpenAI GPT models and compatible
//! chat-completions endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{api_key_from_env, check_status, AIError, AIProvider, GenerationOptions};

/// OpenAI API provider.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    options: GenerationOptions,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    ///
    /// Reads API key from OPENAI_API_KEY environment variable.
    pub fn new() -> anyhow::Result<Self> {
        let api_key = api_key_from_env("OPENAI_API_KEY")?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            options: GenerationOptions::default(),
        })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create with a custom base URL (for compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set generation options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
            max_tokens: Some(self.options.max_output_tokens),
            temperature: self.options.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.options.timeout)
            .json(&request)
            .send()
            .await?;

        let response: OpenAIResponse = check_status(response).await?.json().await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AIError::NoResponse("OpenAI").into())
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        // Check if we can reach the API
        let response = self
            .client
            .get(format!("{}/models", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await;

        response.map(|r| r.status().is_success()).unwrap_or(false)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(openai_env)]
    fn test_openai_provider_requires_api_key() {
        // Save current value
        let original = std::env::var("OPENAI_API_KEY").ok();
        std::env::remove_var("OPENAI_API_KEY");

        let result = OpenAIProvider::new();

        // Restore original value
        if let Some(val) = original {
            std::env::set_var("OPENAI_API_KEY", val);
        }

        assert!(result.is_err());
    }

    #[test]
    #[serial(openai_env)]
    fn test_openai_provider_with_model() {
        let original = std::env::var("OPENAI_API_KEY").ok();
        std::env::set_var("OPENAI_API_KEY", "test-key");

        let provider = OpenAIProvider::new().unwrap().with_model("gpt-4o-mini");
        assert_eq!(provider.model(), "gpt-4o-mini");
        assert_eq!(provider.name(), "openai");

        // Restore or remove
        match original {
            Some(val) => std::env::set_var("OPENAI_API_KEY", val),
            None => std::env::remove_var("OPENAI_API_KEY"),
        }
    }

    #[test]
    fn test_response_parsing() {
        let response: OpenAIResponse = serde_json::from_str(
            r##"{"choices": [{"message": {"role": "assistant", "content": "# Title"}}]}"##,
        )
        .unwrap();
        assert_eq!(response.choices[0].message.content, "# Title");
    }
}
