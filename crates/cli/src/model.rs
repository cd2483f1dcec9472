// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Chat-completion model client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::http;

/// Reply used when the endpoint answers without usable content.
pub const NO_CONTENT: &str = "No response content.";

/// A model that completes a single-turn prompt.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Read the API key from the environment variable `name`.
pub fn api_key_from_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(Error::MissingApiKey(name.to_string())),
    }
}

/// Extract `choices[0].message.content` from a response body.
///
/// Bodies that are not JSON, or lack the field, yield [`NO_CONTENT`].
pub fn parse_reply(body: &str) -> String {
    let parsed: ChatResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("model response is not valid JSON: {}", err);
            return NO_CONTENT.to_string();
        }
    };

    match parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
    {
        Some(content) if !content.is_empty() => content,
        _ => {
            tracing::warn!("model response has no message content");
            NO_CONTENT.to_string()
        }
    }
}

/// OpenAI-compatible `/chat/completions` client.
pub struct ChatCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
    referer: Option<String>,
    title: Option<String>,
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ChatCompletionClient {
    pub fn new(config: &ModelConfig, api_key: String) -> Result<Self> {
        let timeout = config.timeout_secs.map(Duration::from_secs);
        Ok(Self {
            client: http::client(timeout, http::is_loopback_url(&config.endpoint))?,
            endpoint: config.endpoint.clone(),
            model: config.name.clone(),
            temperature: config.temperature,
            api_key,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    /// Build a client whose key comes from `config.api_key_env`.
    pub fn from_env(config: &ModelConfig) -> Result<Self> {
        let api_key = api_key_from_env(&config.api_key_env)?;
        Self::new(config, api_key)
    }
}

#[async_trait]
impl ModelClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        tracing::debug!("POST {} ({} prompt bytes)", self.endpoint, prompt.len());
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(parse_reply(&text))
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
