//! Integration tests for the chatlens collection and analysis pipeline
//!
//! The page loop is exercised against a scripted in-memory API, and the HTTP
//! clients against a local `httpmock` server.

use std::cell::Cell;
use std::time::Duration;

use chatlens_core::analytics::compute_statistics;
use chatlens_core::collector::manual::parse_manual_input;
use chatlens_core::collector::youtube::{ChatItem, ChatPage};
use chatlens_core::collector::{ApiCollector, ChatApi, HttpChatApi, StopReason};
use chatlens_core::config::{LlmConfig, YoutubeConfig};
use chatlens_core::insight::{analyze_chat, AnalysisMode, CompletionClient, HttpCompletionClient};
use chatlens_core::{Error, MessageKind, Result};
use httpmock::prelude::*;
use serde_json::json;

// ============================================
// Scripted page source
// ============================================

/// Returns full pages with a continuation token until `pages_with_token`
/// pages were served, then one final page without a token.
struct PagedSource {
    page_size: usize,
    pages_with_token: usize,
    requests: Cell<usize>,
}

impl PagedSource {
    fn new(page_size: usize, pages_with_token: usize) -> Self {
        Self {
            page_size,
            pages_with_token,
            requests: Cell::new(0),
        }
    }
}

impl ChatApi for PagedSource {
    fn resolve_chat_id(&self, _stream_id: &str) -> Result<Option<String>> {
        Ok(Some("live-chat".to_string()))
    }

    fn fetch_page(
        &self,
        _chat_id: &str,
        _page_token: Option<&str>,
        _max_results: usize,
    ) -> Result<ChatPage> {
        let n = self.requests.get();
        self.requests.set(n + 1);

        let items: Vec<ChatItem> = (0..self.page_size)
            .map(|i| {
                serde_json::from_value(json!({
                    "snippet": {
                        "displayMessage": format!("page {n} message {i}"),
                        "publishedAt": "2025-06-01T18:00:00Z",
                        "type": "textMessageEvent"
                    },
                    "authorDetails": {
                        "displayName": format!("viewer{}", i % 7),
                        "channelId": format!("UC{}", i % 7)
                    }
                }))
                .unwrap()
            })
            .collect();

        let next_page_token = (n < self.pages_with_token).then(|| format!("token-{n}"));
        Ok(ChatPage {
            items: Some(items),
            next_page_token,
        })
    }
}

#[test]
fn test_collects_exact_target_across_pages() {
    let source = PagedSource::new(200, 10);
    let outcome = ApiCollector::new(&source)
        .with_page_delay(Duration::ZERO)
        .collect("stream", 350);

    assert_eq!(outcome.messages.len(), 350);
    assert_eq!(source.requests.get(), 2);
    assert_eq!(outcome.pages_fetched, 2);
    assert!(matches!(outcome.stop, StopReason::TargetReached));
}

#[test]
fn test_returns_partial_when_tokens_run_out() {
    let source = PagedSource::new(200, 2);
    let outcome = ApiCollector::new(&source)
        .with_page_delay(Duration::ZERO)
        .collect("stream", 1000);

    assert_eq!(outcome.messages.len(), 600);
    assert!(outcome.error().is_none());
    assert!(matches!(outcome.stop, StopReason::Exhausted));
}

#[test]
fn test_never_exceeds_target() {
    for target in [0, 1, 199, 200, 201, 401] {
        let source = PagedSource::new(200, 3);
        let outcome = ApiCollector::new(&source)
            .with_page_delay(Duration::ZERO)
            .collect("stream", target);
        assert!(outcome.messages.len() <= target, "target {target}");
    }
}

// ============================================
// End-to-end pipeline
// ============================================

struct EchoClient;

impl CompletionClient for EchoClient {
    fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        Ok(format!("analyzed {} chars", prompt.len()))
    }
}

#[test]
fn test_manual_input_through_stats_and_insight() {
    chatlens_core::logging::init_test();

    let messages = parse_manual_input("Alice: hello\nBob: hi there\nnoColonLine\nAlice: again");
    let stats = compute_statistics(&messages);

    assert_eq!(stats.total_messages, 4);
    assert_eq!(stats.unique_authors, 3);
    assert_eq!(stats.top_authors[0].author, "Alice");
    assert_eq!(stats.top_authors[0].count, 2);

    let text = analyze_chat(&messages, AnalysisMode::Comprehensive, &EchoClient);
    assert!(text.starts_with("analyzed "));
}

// ============================================
// HTTP clients
// ============================================

fn youtube_config(server: &MockServer) -> YoutubeConfig {
    YoutubeConfig {
        endpoint: server.base_url(),
        ..Default::default()
    }
}

#[test]
fn test_http_chat_api_pages_through_live_chat() {
    let server = MockServer::start();

    let resolve = server.mock(|when, then| {
        when.method(GET)
            .path("/videos")
            .query_param("part", "liveStreamingDetails")
            .query_param("id", "abc123")
            .query_param("key", "yt-key");
        then.status(200).json_body(json!({
            "items": [{ "liveStreamingDetails": { "activeLiveChatId": "chat-xyz" } }]
        }));
    });

    let first_page = server.mock(|when, then| {
        when.method(GET)
            .path("/liveChat/messages")
            .query_param("liveChatId", "chat-xyz")
            .query_param("part", "snippet,authorDetails")
            .query_param("maxResults", "5");
        then.status(200).json_body(json!({
            "nextPageToken": "t1",
            "items": [
                {
                    "snippet": {
                        "displayMessage": "hello",
                        "publishedAt": "2025-06-01T18:00:00Z",
                        "type": "textMessageEvent"
                    },
                    "authorDetails": {
                        "displayName": "Mod",
                        "channelId": "UCmod",
                        "isChatModerator": true
                    }
                },
                {
                    "snippet": { "displayMessage": "$5!", "type": "superChatEvent" },
                    "authorDetails": { "displayName": "Fan", "channelId": "UCfan" }
                }
            ]
        }));
    });

    let second_page = server.mock(|when, then| {
        when.method(GET)
            .path("/liveChat/messages")
            .query_param("pageToken", "t1")
            .query_param("maxResults", "3");
        then.status(200).json_body(json!({
            "items": [{
                "snippet": { "displayMessage": "bye", "publishedAt": "2025-06-01T18:01:00Z" },
                "authorDetails": { "displayName": "Owner", "isChatOwner": true, "isVerified": true }
            }]
        }));
    });

    let api = HttpChatApi::with_key(&youtube_config(&server), "yt-key").unwrap();
    let outcome = ApiCollector::new(&api)
        .with_page_delay(Duration::ZERO)
        .collect("abc123", 5);

    resolve.assert();
    first_page.assert();
    second_page.assert();

    assert!(matches!(outcome.stop, StopReason::Exhausted));
    let messages = outcome.messages;
    assert_eq!(messages.len(), 3);
    assert!(messages[0].is_moderator);
    assert_eq!(messages[1].kind, MessageKind::SuperChat);
    assert_eq!(messages[2].author_id, None);
    assert!(messages[2].is_owner && messages[2].is_verified);
}

#[test]
fn test_http_chat_api_offline_stream_is_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/videos");
        then.status(200).json_body(json!({ "items": [] }));
    });

    let api = HttpChatApi::with_key(&youtube_config(&server), "yt-key").unwrap();
    let outcome = ApiCollector::new(&api).collect("offline", 50);

    assert!(outcome.messages.is_empty());
    assert!(matches!(outcome.error(), Some(Error::ChatUnavailable(_))));
}

#[test]
fn test_http_chat_api_error_status_keeps_partial() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/videos");
        then.status(200).json_body(json!({
            "items": [{ "liveStreamingDetails": { "activeLiveChatId": "chat-1" } }]
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/liveChat/messages")
            .query_param("maxResults", "10");
        then.status(200).json_body(json!({
            "nextPageToken": "t1",
            "items": [{ "snippet": { "displayMessage": "only one" } }]
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/liveChat/messages")
            .query_param("pageToken", "t1");
        then.status(403)
            .json_body(json!({ "error": { "message": "quotaExceeded" } }));
    });

    let api = HttpChatApi::with_key(&youtube_config(&server), "yt-key").unwrap();
    let outcome = ApiCollector::new(&api)
        .with_page_delay(Duration::ZERO)
        .collect("abc", 10);

    assert_eq!(outcome.messages.len(), 1);
    match outcome.error() {
        Some(Error::Transport(msg)) => assert!(msg.contains("403")),
        other => panic!("expected transport error, got {other:?}"),
    }
}

fn claude_config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        endpoint: Some(server.base_url()),
        api_key: Some("sk-test".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_claude_completion_round_trip() {
    let server = MockServer::start();
    let completion = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .header("x-api-key", "sk-test")
            .header("anthropic-version", "2023-06-01");
        then.status(200).json_body(json!({
            "content": [{ "type": "text", "text": "The chat is upbeat." }]
        }));
    });

    let client = HttpCompletionClient::new(&claude_config(&server)).unwrap();
    let messages = parse_manual_input("Alice: love it\nBob: so good");
    let text = analyze_chat(&messages, AnalysisMode::Sentiment, &client);

    completion.assert();
    assert_eq!(text, "The chat is upbeat.");
}

#[test]
fn test_completion_failure_becomes_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(500).body("overloaded");
    });

    let client = HttpCompletionClient::new(&claude_config(&server)).unwrap();
    let messages = parse_manual_input("Alice: hi");
    let text = analyze_chat(&messages, AnalysisMode::Themes, &client);

    assert!(text.starts_with("Error analyzing chat: claude returned 500"));
    assert!(!text.contains("analysis service error"));
}
