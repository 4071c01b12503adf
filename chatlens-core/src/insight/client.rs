//! HTTP completion clients for Claude, OpenAI and Ollama.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use crate::config::{LlmConfig, LlmProvider};
use crate::error::{Error, Result};

use super::CompletionClient;

/// Create the default HTTP-backed completion client.
pub fn create_completion_client(llm: &LlmConfig) -> Result<Box<dyn CompletionClient>> {
    Ok(Box::new(HttpCompletionClient::new(llm)?))
}

/// [`CompletionClient`] that calls the configured provider over HTTP.
///
/// Each call blocks on a private current-thread runtime.
pub struct HttpCompletionClient {
    model: String,
    provider: LlmProvider,
    endpoint: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f32,
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

impl HttpCompletionClient {
    /// Build a client, failing with [`Error::MissingCredential`] when the
    /// provider needs a key and none is configured.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("failed to build tokio runtime: {e}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs.max(1)));
        }
        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: config.model.clone(),
            provider: config.provider,
            endpoint: config.resolved_endpoint().trim_end_matches('/').to_string(),
            api_key,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            runtime,
            http,
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = self.api_key.as_deref().unwrap_or_default();
        match self.provider {
            LlmProvider::Ollama => {}
            LlmProvider::Claude => {
                headers.insert(
                    "x-api-key",
                    HeaderValue::from_str(key)
                        .map_err(|e| Error::Config(format!("invalid claude api key header: {e}")))?,
                );
                headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
            }
            LlmProvider::OpenAI => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {key}"))
                        .map_err(|e| Error::Config(format!("invalid auth header: {e}")))?,
                );
            }
        }
        Ok(headers)
    }

    fn request(&self, system: &str, prompt: &str) -> (String, serde_json::Value) {
        match self.provider {
            LlmProvider::Ollama => (
                format!("{}/api/generate", self.endpoint),
                json!({
                    "model": self.model,
                    "system": system,
                    "prompt": prompt,
                    "stream": false,
                    "options": {
                        "temperature": self.temperature,
                        "num_predict": self.max_tokens,
                    },
                }),
            ),
            LlmProvider::Claude => (
                format!("{}/v1/messages", self.endpoint),
                json!({
                    "model": self.model,
                    "max_tokens": self.max_tokens,
                    "temperature": self.temperature,
                    "system": system,
                    "messages": [{ "role": "user", "content": prompt }],
                }),
            ),
            LlmProvider::OpenAI => (
                format!("{}/v1/chat/completions", self.endpoint),
                json!({
                    "model": self.model,
                    "max_tokens": self.max_tokens,
                    "temperature": self.temperature,
                    "messages": [
                        { "role": "system", "content": system },
                        { "role": "user", "content": prompt }
                    ],
                }),
            ),
        }
    }
}

/// Pull the reply text out of a provider response body.
fn extract_text(provider: LlmProvider, json: &serde_json::Value) -> Option<String> {
    let text = match provider {
        LlmProvider::Ollama => json.get("response"),
        LlmProvider::Claude => json
            .get("content")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|v| v.get("text")),
        LlmProvider::OpenAI => json
            .get("choices")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content")),
    };
    text.and_then(|v| v.as_str()).map(ToString::to_string)
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let name = self.provider.as_str();
        let headers = self.headers()?;
        let (url, body) = self.request(system, prompt);

        self.runtime.block_on(async {
            let resp = self
                .http
                .post(url)
                .headers(headers)
                .json(&body)
                .send()
                .await
                .map_err(|e| Error::AnalysisService(format!("{name} request failed: {e}")))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| Error::AnalysisService(format!("{name} read body failed: {e}")))?;
            if !status.is_success() {
                return Err(Error::AnalysisService(format!(
                    "{} returned {}: {}",
                    name,
                    status.as_u16(),
                    body
                )));
            }
            let json: serde_json::Value = serde_json::from_str(&body)?;
            extract_text(self.provider, &json).ok_or_else(|| {
                Error::AnalysisService(format!("{name} response missing reply text"))
            })
        })
    }
}
