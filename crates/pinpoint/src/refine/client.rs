//! OpenAI-compatible chat client for locator refinement.
//!
//! Works against any server exposing `/v1/chat/completions` (ollama,
//! llama.cpp, hosted APIs).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{parse_refinement_response, RefinedLocators, RefinementRequest};
use crate::result::{LocatorError, LocatorResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Sends refinement prompts to a chat completion endpoint.
#[derive(Debug, Clone)]
pub struct RefinementClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RefinementClient {
    /// Create a client for `base_url` (e.g. `http://localhost:11434`).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
            client,
        }
    }

    /// Send a bearer token with every request
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Returns the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_request(&self, request: &RefinementRequest) -> LocatorResult<ChatRequest> {
        Ok(ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt()?,
            }],
            temperature: 0.0,
            stream: false,
        })
    }

    /// Ask the model for refined locators.
    pub async fn refine(&self, request: &RefinementRequest) -> LocatorResult<RefinedLocators> {
        if request.is_empty() {
            return Err(LocatorError::refinement("no locators to refine"));
        }

        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(target: "pinpoint", %url, model = %self.model, "requesting refinement");

        let mut http = self.client.post(&url).json(&self.chat_request(request)?);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }
        let resp = http
            .send()
            .await
            .map_err(|e| LocatorError::refinement(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LocatorError::refinement(format!(
                "API error {}: {body}",
                status.as_u16()
            )));
        }

        let response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LocatorError::refinement(format!("malformed response: {e}")))?;
        parse_refinement_response(&reply_content(response)?)
    }
}

fn reply_content(response: ChatResponse) -> LocatorResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| LocatorError::refinement("response has no choices"))
}
