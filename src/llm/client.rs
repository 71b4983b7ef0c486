//! Vision LLM client.
//!
//! Sends a prompt plus one page image to either an OpenAI-compatible
//! chat-completions endpoint or a local Ollama instance. Cloud calls get an
//! optional pre-request delay (SIFT_DELAY_MS) and retry on HTTP 429.

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::config::{LlmConfig, LlmProvider};
use super::retry::{backoff_delay, delay_from_env, parse_retry_after};

/// Maximum retry attempts on rate limit (429) errors.
const MAX_RETRIES: u32 = 5;

/// Errors that can occur during vision model calls.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Rate limited after retries")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Vision calls are disabled")]
    Disabled,
}

/// Vision LLM client.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

// === OpenAI-compatible chat request/response ===

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// === Ollama request/response ===

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    images: Vec<String>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl LlmClient {
    /// Create a new vision client with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300)) // 5 min timeout for slow models
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Check if the vision backend is available.
    pub async fn is_available(&self) -> bool {
        if !self.config.enabled() {
            return false;
        }
        match self.config.provider() {
            LlmProvider::Ollama => {
                let url = format!("{}/api/tags", self.config.endpoint());
                match self.client.get(&url).send().await {
                    Ok(resp) => resp.status().is_success(),
                    Err(_) => false,
                }
            }
            LlmProvider::OpenAI => self.config.api_key().is_some(),
        }
    }

    /// List available models (Ollama only).
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        if *self.config.provider() != LlmProvider::Ollama {
            return Err(LlmError::Api(
                "model listing is only supported for Ollama".to_string(),
            ));
        }

        let url = format!("{}/api/tags", self.config.endpoint());
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LlmError::Api(format!("HTTP {}", resp.status())));
        }

        #[derive(Deserialize)]
        struct TagsResponse {
            models: Vec<ModelInfo>,
        }

        #[derive(Deserialize)]
        struct ModelInfo {
            name: String,
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Ask the model a question about a PNG page image.
    ///
    /// Returns the raw text reply.
    pub async fn ask_about_image(
        &self,
        prompt: &str,
        png_bytes: &[u8],
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        if !self.config.enabled() {
            return Err(LlmError::Disabled);
        }

        let image_base64 = base64::engine::general_purpose::STANDARD.encode(png_bytes);

        let delay = delay_from_env("SIFT_DELAY_MS", 0);
        if delay > std::time::Duration::ZERO {
            debug!("waiting {:?} before vision request", delay);
            tokio::time::sleep(delay).await;
        }

        match self.config.provider() {
            LlmProvider::OpenAI => self.call_chat(prompt, &image_base64, max_tokens).await,
            LlmProvider::Ollama => self.call_ollama(prompt, &image_base64, max_tokens).await,
        }
    }

    /// Call an OpenAI-compatible chat completions endpoint with an inline image.
    async fn call_chat(
        &self,
        prompt: &str,
        image_base64: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.config.model().to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/png;base64,{}", image_base64),
                        },
                    },
                ],
            }],
            max_tokens,
            temperature: self.config.temperature(),
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint().trim_end_matches('/')
        );

        let resp = self
            .send_with_retry(|| {
                let mut builder = self.client.post(&url).json(&request);
                if let Some(key) = self.config.api_key() {
                    builder = builder.bearer_auth(key);
                }
                builder
            })
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("Empty chat response".to_string()))
    }

    /// Call the Ollama generate API with an inline image.
    async fn call_ollama(
        &self,
        prompt: &str,
        image_base64: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = OllamaRequest {
            model: self.config.model().to_string(),
            prompt: prompt.to_string(),
            images: vec![image_base64.to_string()],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature(),
                num_predict: max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.endpoint());
        let resp = self
            .send_with_retry(|| self.client.post(&url).json(&request))
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(ollama_resp.response)
    }

    /// Send a request, retrying on 429 with exponential backoff.
    ///
    /// Respects the Retry-After header when the server provides one.
    async fn send_with_retry<F>(&self, make_request: F) -> Result<reqwest::Response, LlmError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let resp = make_request()
                .send()
                .await
                .map_err(|e| LlmError::Connection(e.to_string()))?;

            if resp.status().as_u16() != 429 {
                return Ok(resp);
            }

            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let retry_after_secs = retry_after.as_deref().and_then(|s| s.parse::<u64>().ok());

            if attempt >= MAX_RETRIES {
                return Err(LlmError::RateLimited { retry_after_secs });
            }

            let wait = parse_retry_after(retry_after.as_deref())
                .unwrap_or_else(|| backoff_delay(attempt, 1000));

            warn!(
                "{} rate limited (attempt {}), waiting {:?}",
                self.config.provider_name(),
                attempt + 1,
                wait
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}
