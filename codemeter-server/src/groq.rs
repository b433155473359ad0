//! Groq chat-completions client used for AI analysis.

use codemeter_core::{ChatMessage, CodeMeterError, CompletionClient};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible Groq endpoint.
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
/// Default model used for analysis.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-70b-versatile";

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Groq API client implementation.
#[derive(Debug, Clone)]
pub struct GroqApiClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl GroqApiClient {
    /// Build a client for an explicit endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            client: Client::new(),
        }
    }

    /// Build a Groq client from `GROQ_API_KEY`, `GROQ_API_URL` and `GROQ_MODEL`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("GROQ_API_URL").unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string());
        let model = std::env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_GROQ_MODEL.to_string());
        Self::new(base_url, std::env::var("GROQ_API_KEY").ok(), model)
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionClient for GroqApiClient {
    fn complete(&self, messages: &[ChatMessage]) -> codemeter_core::Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| CodeMeterError::Provider("GROQ_API_KEY is required".to_string()))?;
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        log::debug!("sending analysis request to {url} with model {}", self.model);
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|err| CodeMeterError::Provider(format!("groq request failed: {err}")))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(CodeMeterError::Provider(format!(
                "groq api error ({status}): {body}"
            )));
        }
        let value: CompletionResponse = response
            .json()
            .map_err(|err| CodeMeterError::Parse(format!("groq response decode failed: {err}")))?;

        value
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CodeMeterError::Provider("no response from groq".to_string()))
    }
}
