//! Configuration management for BloggerAI.
//!
//! Handles loading configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".bloggerai.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Model provider settings
    pub ai: AiConfig,

    /// Calendar defaults
    pub calendar: CalendarConfig,

    /// Article generation settings
    pub article: ArticleConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory calendars and articles are written to (`~` is expanded)
    pub output_dir: String,
}

/// Model provider settings.
///
/// API keys are never read from here; they come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// AI provider (gemini, openai, claude, ollama)
    pub provider: String,

    /// Model to use (provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Override the provider's API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Upper bound on reply length
    pub max_output_tokens: u32,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Ollama-specific settings
    pub ollama: OllamaConfig,
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama server URL
    pub base_url: String,

    /// Model to use
    pub model: String,
}

/// Calendar defaults used when the command line leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub duration_months: u32,
    pub posts_per_week: u32,
}

/// Article generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleConfig {
    /// How many secondary keywords are offered to the model per article
    pub extra_keywords: usize,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.bloggerai.toml` in current directory
    /// 2. `~/.config/bloggerai/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        // Try local config first
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try global config
        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        // Return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("bloggerai"))
    }

    /// Output directory with `~` and environment variables expanded.
    pub fn output_dir(&self) -> PathBuf {
        let raw = &self.general.output_dir;
        match shellexpand::full(raw) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => PathBuf::from(raw),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { output_dir: ".".to_string() }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            base_url: None,
            max_output_tokens: 8192,
            temperature: None,
            timeout_secs: 120,
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:11434".to_string(), model: "llama3.2".to_string() }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { duration_months: 6, posts_per_week: 2 }
    }
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self { extra_keywords: 5 }
    }
}
