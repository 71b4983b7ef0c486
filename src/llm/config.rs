//! Vision LLM client configuration.
//!
//! Split into two tiers:
//! - `LlmAppConfig`: From the config file (prompts, generation params)
//! - `LlmDeviceConfig`: From env vars, device-specific (provider, endpoint, model, api_key)
//!
//! Env vars: SIFT_PROVIDER, SIFT_MODEL, SIFT_ENDPOINT, SIFT_API_KEY
//! (generic LLM_* names also accepted as fallback)

use serde::{Deserialize, Serialize};

use super::prompts::{DEFAULT_CLASSIFY_PROMPT, DEFAULT_EXTRACT_PROMPT};

/// LLM provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Ollama API (local, default)
    #[default]
    Ollama,
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    OpenAI,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }
}

/// Application-level settings (from the config file).
/// Controls what the model is asked, not how to connect to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmAppConfig {
    /// Whether vision calls are enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum tokens for the yes/no page classification reply
    #[serde(default = "default_classify_tokens")]
    pub classify_max_tokens: u32,
    /// Maximum tokens for the product extraction reply
    #[serde(default = "default_extract_tokens")]
    pub extract_max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Custom prompt for page classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classify_prompt: Option<String>,
    /// Custom prompt for product extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_prompt: Option<String>,
}

/// Device-level settings (from env vars, varies per device).
/// Controls how to connect to the model backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmDeviceConfig {
    /// Provider (ollama or openai)
    pub provider: LlmProvider,
    /// API endpoint (provider-specific defaults apply)
    pub endpoint: String,
    /// Vision model to use
    pub model: String,
    /// API key for OpenAI-compatible providers
    pub api_key: Option<String>,
}

/// Combined runtime configuration.
///
/// Serde: Only the app config is serialized/deserialized (config-file
/// settings). Device config is populated from environment variables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Application-level settings (from the config file)
    #[serde(flatten)]
    pub app: LlmAppConfig,
    /// Device-level settings (from env) - not serialized
    #[serde(skip)]
    pub device: LlmDeviceConfig,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llava:13b".to_string()
}

fn default_classify_tokens() -> u32 {
    10
}

fn default_extract_tokens() -> u32 {
    200
}

fn default_temperature() -> f32 {
    0.1
}

// === LlmAppConfig implementations ===

impl Default for LlmAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            classify_max_tokens: default_classify_tokens(),
            extract_max_tokens: default_extract_tokens(),
            temperature: default_temperature(),
            classify_prompt: None,
            extract_prompt: None,
        }
    }
}

impl LlmAppConfig {
    /// Get the classification prompt, using custom or default.
    pub fn get_classify_prompt(&self) -> &str {
        self.classify_prompt
            .as_deref()
            .unwrap_or(DEFAULT_CLASSIFY_PROMPT)
    }

    /// Get the extraction prompt, using custom or default.
    pub fn get_extract_prompt(&self) -> &str {
        self.extract_prompt
            .as_deref()
            .unwrap_or(DEFAULT_EXTRACT_PROMPT)
    }
}

// === LlmDeviceConfig implementations ===

impl Default for LlmDeviceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LlmDeviceConfig {
    /// Create device config from environment variables.
    ///
    /// Env vars (SIFT_* preferred, LLM_* accepted as fallback):
    /// - SIFT_PROVIDER / LLM_PROVIDER: ollama, openai, groq, together
    /// - SIFT_MODEL / LLM_MODEL: model ID
    /// - SIFT_ENDPOINT / LLM_ENDPOINT: API base URL
    /// - SIFT_API_KEY / LLM_API_KEY: API key
    pub fn from_env() -> Self {
        let mut config = Self {
            provider: LlmProvider::default(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
        };

        let explicit_provider = std::env::var("SIFT_PROVIDER")
            .or_else(|_| std::env::var("LLM_PROVIDER"))
            .ok();
        if let Some(ref val) = explicit_provider {
            if let Some(provider) = LlmProvider::from_str(val) {
                config.provider = provider;
            }
        }

        // Explicit endpoint always wins, then OLLAMA_HOST for Ollama provider
        let explicit_endpoint = std::env::var("SIFT_ENDPOINT")
            .or_else(|_| std::env::var("LLM_ENDPOINT"))
            .ok();
        if let Some(ref endpoint) = explicit_endpoint {
            config.endpoint = endpoint.clone();
        } else if let Ok(ollama_host) = std::env::var("OLLAMA_HOST") {
            config.endpoint = ollama_host;
        }

        if let Ok(val) = std::env::var("SIFT_API_KEY").or_else(|_| std::env::var("LLM_API_KEY")) {
            config.api_key = Some(val);
        }

        let explicit_model = std::env::var("SIFT_MODEL")
            .or_else(|_| std::env::var("LLM_MODEL"))
            .ok();

        // If provider was explicitly set, use provider-specific defaults
        if let Some(ref provider_str) = explicit_provider {
            let provider_lower = provider_str.to_lowercase();

            if explicit_endpoint.is_none() {
                match provider_lower.as_str() {
                    "groq" => config.endpoint = "https://api.groq.com/openai".to_string(),
                    "openai" => config.endpoint = "https://api.openai.com".to_string(),
                    "together" => config.endpoint = "https://api.together.xyz".to_string(),
                    _ => {}
                }
            }

            if config.api_key.is_none() {
                match provider_lower.as_str() {
                    "groq" => config.api_key = std::env::var("GROQ_API_KEY").ok(),
                    "openai" => config.api_key = std::env::var("OPENAI_API_KEY").ok(),
                    _ => {}
                }
            }

            if explicit_model.is_none() {
                match provider_lower.as_str() {
                    "groq" => {
                        config.model = "llama-3.2-90b-vision-preview".to_string();
                    }
                    "openai" | "together" => config.model = "gpt-4o-mini".to_string(),
                    _ => {}
                }
            }
        } else {
            // No explicit provider - auto-detect from available keys
            if config.api_key.is_none() {
                if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                    config.api_key = Some(key);
                    config.provider = LlmProvider::OpenAI;
                    if explicit_endpoint.is_none() {
                        config.endpoint = "https://api.openai.com".to_string();
                    }
                    if config.model == default_model() {
                        config.model = "gpt-4o-mini".to_string();
                    }
                }
            }
        }

        if let Some(model) = explicit_model {
            config.model = model;
        }

        config
    }

    /// Get the provider name for display.
    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            LlmProvider::Ollama => "Ollama",
            LlmProvider::OpenAI => {
                if self.endpoint.contains("groq.com") {
                    "Groq"
                } else if self.endpoint.contains("together.xyz") {
                    "Together.ai"
                } else {
                    "OpenAI"
                }
            }
        }
    }

    /// Get a provider-aware availability hint for error messages.
    pub fn availability_hint(&self) -> String {
        match self.provider {
            LlmProvider::Ollama => {
                format!(
                    "Ollama not available at {}. Make sure Ollama is running: ollama serve",
                    self.endpoint
                )
            }
            LlmProvider::OpenAI => {
                if self.api_key.is_none() {
                    "API key not set. Set OPENAI_API_KEY or SIFT_API_KEY".to_string()
                } else {
                    format!("API not available at {}", self.endpoint)
                }
            }
        }
    }
}

// === LlmConfig (combined) implementations ===

impl LlmConfig {
    /// Create from app config (file) and device config (env).
    pub fn new(app: LlmAppConfig, device: LlmDeviceConfig) -> Self {
        Self { app, device }
    }

    /// Create with default app config and device config from env.
    pub fn from_env() -> Self {
        Self::default()
    }

    // Convenience accessors that delegate to sub-configs

    pub fn enabled(&self) -> bool {
        self.app.enabled
    }

    pub fn provider(&self) -> &LlmProvider {
        &self.device.provider
    }

    pub fn endpoint(&self) -> &str {
        &self.device.endpoint
    }

    pub fn model(&self) -> &str {
        &self.device.model
    }

    pub fn api_key(&self) -> Option<&str> {
        self.device.api_key.as_deref()
    }

    pub fn temperature(&self) -> f32 {
        self.app.temperature
    }

    pub fn get_classify_prompt(&self) -> &str {
        self.app.get_classify_prompt()
    }

    pub fn get_extract_prompt(&self) -> &str {
        self.app.get_extract_prompt()
    }

    pub fn provider_name(&self) -> &'static str {
        self.device.provider_name()
    }

    pub fn availability_hint(&self) -> String {
        self.device.availability_hint()
    }

    // Setters for CLI override use cases

    pub fn set_endpoint(&mut self, endpoint: String) {
        self.device.endpoint = endpoint;
    }

    pub fn set_model(&mut self, model: String) {
        self.device.model = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!(LlmProvider::from_str("ollama"), Some(LlmProvider::Ollama));
        assert_eq!(LlmProvider::from_str("OpenAI"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::from_str("groq"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::from_str("bedrock"), None);
    }

    #[test]
    fn test_app_config_defaults() {
        let app = LlmAppConfig::default();
        assert!(app.enabled);
        assert_eq!(app.classify_max_tokens, 10);
        assert_eq!(app.extract_max_tokens, 200);
        assert!(app.classify_prompt.is_none());
        assert!(app.get_classify_prompt().contains("yes"));
        assert!(app.get_extract_prompt().contains("Manufacturer:"));
    }

    #[test]
    fn test_custom_prompts_override_defaults() {
        let app = LlmAppConfig {
            classify_prompt: Some("custom classify".to_string()),
            ..Default::default()
        };
        assert_eq!(app.get_classify_prompt(), "custom classify");
        assert_eq!(app.get_extract_prompt(), DEFAULT_EXTRACT_PROMPT);
    }

    #[test]
    fn test_app_config_parses_partial_toml() {
        let parsed: LlmAppConfig =
            toml::from_str("enabled = true\ntemperature = 0.0\n").unwrap();
        assert_eq!(parsed.temperature, 0.0);
        assert_eq!(parsed.extract_max_tokens, 200);
    }
}
