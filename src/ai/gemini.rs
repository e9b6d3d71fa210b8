//! Google Gemini API integration.
//!
//! Implements the AIProvider trait for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{api_key_from_env, check_status, AIError, AIProvider, GenerationOptions};

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    options: GenerationOptions,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// Reads API key from GEMINI_API_KEY environment variable.
    pub fn new() -> anyhow::Result<Self> {
        let api_key = api_key_from_env("GEMINI_API_KEY")?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
            options: GenerationOptions::default(),
        })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create with a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set generation options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt.to_string() }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.options.max_output_tokens,
                temperature: self.options.temperature,
            },
        }
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let request = self.build_request(prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.options.timeout)
            .json(&request)
            .send()
            .await?;

        let response: GenerateContentResponse = check_status(response).await?.json().await?;
        extract_text(response).ok_or_else(|| AIError::NoResponse("Gemini").into())
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        let response = self
            .client
            .get(format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model))
            .header("x-goog-api-key", &self.api_key)
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await;

        response.map(|r| r.status().is_success()).unwrap_or(false)
    }
}

/// Join the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Gemini API request structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Gemini API response structure.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn provider() -> GeminiProvider {
        GeminiProvider {
            client: Client::new(),
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
            options: GenerationOptions::default(),
        }
    }

    #[test]
    #[serial(gemini_env)]
    fn test_gemini_provider_requires_api_key() {
        let original = std::env::var("GEMINI_API_KEY").ok();
        std::env::remove_var("GEMINI_API_KEY");

        let result = GeminiProvider::new();

        if let Some(val) = original {
            std::env::set_var("GEMINI_API_KEY", val);
        }

        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint() {
        let provider = provider().with_base_url("http://localhost:8080/v1beta/");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(provider().build_request("hello")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "[{\"a\":"}, {"text": " 1}]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("[{\"a\": 1}]"));
    }

    #[test]
    fn test_extract_text_empty() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_text(response).is_none());

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(extract_text(response).is_none());
    }
}
