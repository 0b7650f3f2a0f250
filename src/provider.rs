//! Generation Client
//!
//! Request/response boundary to an OpenAI-compatible chat completion API. One call per
//! subject, no retries: callers own retry and back-off policy. Failures are classified
//! as transport errors, rate limiting, or empty responses.

use crate::config::WikiConfig;
use crate::error::{GenerationError, WikiError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Text generation boundary used by the batch pipeline and the interactive tool.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for `subject` using `prompt_template` (one `%s` slot).
    async fn generate(&self, prompt_template: &str, subject: &str)
        -> Result<String, GenerationError>;
}

/// Substitute `subject` into the first `%s` of the template.
/// Templates without a slot get the subject appended after a space.
pub fn render_prompt(prompt_template: &str, subject: &str) -> String {
    match prompt_template.find("%s") {
        Some(idx) => {
            let mut rendered = String::with_capacity(prompt_template.len() + subject.len());
            rendered.push_str(&prompt_template[..idx]);
            rendered.push_str(subject);
            rendered.push_str(&prompt_template[idx + 2..]);
            rendered
        }
        None => format!("{} {}", prompt_template, subject),
    }
}

/// Completion options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: Some(1.0),
            max_tokens: Some(2000),
            top_p: Some(1.0),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: OpenAIMessage,
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn build_provider_http_client() -> Result<Client, WikiError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| WikiError::Http(format!("Failed to create HTTP client: {}", e)))
}

fn map_http_error(error: reqwest::Error) -> GenerationError {
    if error.status() == Some(StatusCode::TOO_MANY_REQUESTS) {
        GenerationError::RateLimited(error.to_string())
    } else if error.is_timeout() {
        GenerationError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        GenerationError::Transport(format!("Connection error: {}", error))
    } else {
        GenerationError::Transport(format!("HTTP error: {}", error))
    }
}

/// Classify a non-success response. Some gateways report throttling with a
/// non-429 status, so the body is checked as well.
fn classify_status(status: StatusCode, body: &str) -> GenerationError {
    if status == StatusCode::TOO_MANY_REQUESTS || body.to_ascii_lowercase().contains("rate limit")
    {
        GenerationError::RateLimited(format!("status {}: {}", status, body))
    } else {
        GenerationError::Transport(format!("Request failed with status {}: {}", status, body))
    }
}

/// OpenAI chat completion client
pub struct OpenAiClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
    options: CompletionOptions,
}

impl OpenAiClient {
    pub fn new(model: String, api_key: String, base_url: Option<String>) -> Result<Self, WikiError> {
        let client = build_provider_http_client()?;
        let base_url = base_url
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            model,
            api_key,
            base_url,
            options: CompletionOptions::default(),
        })
    }

    pub fn from_config(config: &WikiConfig) -> Result<Self, WikiError> {
        let api_key = config.require_api_key()?.to_string();
        Self::new(config.model.clone(), api_key, Some(config.base_url.clone()))
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(
        &self,
        prompt_template: &str,
        subject: &str,
    ) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: render_prompt(prompt_template, subject),
            }],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
            top_p: self.options.top_p,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, subject, "Sending chat completion request");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, &error_text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Transport(format!("Failed to parse response: {}", e)))?;

        match completion.choices.into_iter().next() {
            Some(choice) if !choice.message.content.trim().is_empty() => {
                Ok(choice.message.content)
            }
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}
