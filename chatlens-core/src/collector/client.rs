//! HTTP client for the YouTube Data API live chat endpoints
//!
//! Requests run on a private current-thread runtime so callers stay
//! synchronous.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::{YoutubeConfig, YOUTUBE_API_KEY_ENV};
use crate::error::{Error, Result};

use super::youtube::{ChatApi, ChatPage, VideoListResponse};

/// [`ChatApi`] backed by `https://www.googleapis.com/youtube/v3`.
pub struct HttpChatApi {
    api_key: String,
    base_url: String,
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

impl HttpChatApi {
    /// Create a client from configuration.
    ///
    /// Fails with [`Error::MissingCredential`] when no API key is configured.
    pub fn new(config: &YoutubeConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Self::with_key(config, api_key)
    }

    /// Create a client with an explicit API key.
    ///
    /// A blank key is [`Error::MissingCredential`].
    pub fn with_key(config: &YoutubeConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingCredential(format!(
                "YouTube API key is empty; set youtube.api_key or {}",
                YOUTUBE_API_KEY_ENV
            )));
        }
        let base_url = config.endpoint.trim_end_matches('/').to_string();

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
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url,
            runtime,
            http,
        })
    }

    /// GET `{base_url}/{path}` and decode the JSON body.
    ///
    /// Non-2xx statuses and connection failures are [`Error::Transport`];
    /// an undecodable body is [`Error::MalformedPage`].
    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        self.runtime.block_on(async {
            let response = self
                .http
                .get(&url)
                .query(query)
                .query(&[("key", self.api_key.as_str())])
                .send()
                .await
                .map_err(|e| Error::Transport(format!("HTTP request failed: {e}")))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| Error::Transport(format!("failed to read response: {e}")))?;

            if !status.is_success() {
                return Err(Error::Transport(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    body
                )));
            }

            serde_json::from_str(&body)
                .map_err(|e| Error::MalformedPage(format!("failed to parse response: {e}")))
        })
    }
}

impl ChatApi for HttpChatApi {
    fn resolve_chat_id(&self, stream_id: &str) -> Result<Option<String>> {
        let response: VideoListResponse = self.get_json(
            "videos",
            &[
                ("part", "liveStreamingDetails".to_string()),
                ("id", stream_id.to_string()),
            ],
        )?;
        Ok(response.active_chat_id())
    }

    fn fetch_page(
        &self,
        chat_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<ChatPage> {
        let mut query = vec![
            ("liveChatId", chat_id.to_string()),
            ("part", "snippet,authorDetails".to_string()),
            ("maxResults", max_results.clamp(1, 200).to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        self.get_json("liveChat/messages", &query)
    }
}
