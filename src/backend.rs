use crate::types::{Result, SummarizerError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Single capability both backends implement: one blocking prompt in, one
/// completion out. The summarizer is written against this trait only, so
/// the hosted and local variants stay interchangeable.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name of this backend.
    fn backend_name(&self) -> String;

    /// Generate a completion for `prompt`, synchronously from the
    /// caller's point of view.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Character budget for article bodies, if this backend wants one.
    fn max_content_chars(&self) -> Option<usize> {
        None
    }

    /// Pause inserted between batch items to bound resource contention.
    fn pause_between_items(&self) -> Option<Duration> {
        None
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    text: String,
}

pub struct AnthropicBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicBackend {
    fn backend_name(&self) -> String {
        format!("anthropic ({})", self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            temperature: 0.1,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizerError::Backend(format!("Anthropic request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(SummarizerError::Backend(format!(
                "Anthropic API error: {}",
                error_text
            )));
        }

        let parsed = response
            .json::<AnthropicResponse>()
            .await
            .map_err(|e| SummarizerError::Backend(format!("Failed to parse Anthropic response: {}", e)))?;

        let text = parsed
            .content
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default();

        Ok(text)
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

pub struct OllamaBackend {
    client: Client,
    base_url: Url,
    model: String,
}

impl OllamaBackend {
    pub fn new(host: &str, model: Option<String>) -> Result<Self> {
        // Ollama runs locally, so the request timeout is deliberately long.
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = Url::parse(host)?;

        Ok(Self {
            client,
            base_url,
            model: model.unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// List the models the local server has pulled. Used as a preflight
    /// check so a missing server or model is reported before a long
    /// generation call is issued.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = self.base_url.join("api/tags")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SummarizerError::Backend(format!("Ollama server not reachable: {}", e)))?;

        let tags = response
            .json::<OllamaTagsResponse>()
            .await
            .map_err(|e| SummarizerError::Backend(format!("Failed to parse Ollama model list: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl TextGenerator for OllamaBackend {
    fn backend_name(&self) -> String {
        format!("ollama ({})", self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.base_url.join("api/generate")?;

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions { temperature: 0.1 },
        };

        debug!("Sending {} chars to Ollama model {}", prompt.len(), self.model);

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizerError::Backend(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(SummarizerError::Backend(format!(
                "Ollama API error: {}",
                error_text
            )));
        }

        let parsed = response
            .json::<OllamaResponse>()
            .await
            .map_err(|e| SummarizerError::Backend(format!("Failed to parse Ollama response: {}", e)))?;

        Ok(parsed.response)
    }

    fn max_content_chars(&self) -> Option<usize> {
        // Local models are slow on long inputs, so article bodies are
        // truncated to a fixed budget before prompting.
        Some(2000)
    }

    fn pause_between_items(&self) -> Option<Duration> {
        Some(Duration::from_secs(1))
    }
}

/// Scripted backend that records every prompt it receives. Calls are
/// numbered from 1; any call index listed in `fail_on` returns an error
/// instead of the canned response.
pub struct MockBackend {
    response: String,
    fail_on: Vec<usize>,
    content_budget: Option<usize>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail_on: Vec::new(),
            content_budget: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, calls: Vec<usize>) -> Self {
        self.fail_on = calls;
        self
    }

    pub fn with_content_budget(mut self, budget: usize) -> Self {
        self.content_budget = Some(budget);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockBackend {
    fn backend_name(&self) -> String {
        "mock".to_string()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.fail_on.contains(&call) {
            info!("Mock backend failing call {} as scripted", call);
            return Err(SummarizerError::Backend(format!(
                "scripted failure on call {}",
                call
            )));
        }

        Ok(self.response.clone())
    }

    fn max_content_chars(&self) -> Option<usize> {
        self.content_budget
    }
}
