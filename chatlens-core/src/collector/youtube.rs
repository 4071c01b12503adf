//! YouTube live chat collection
//!
//! Collection is a two step protocol:
//! 1. Resolve the stream id to its `activeLiveChatId` (the chat handle)
//! 2. Page through `liveChat/messages` with the handle, following
//!    `nextPageToken`, pausing a fixed delay between pages
//!
//! The wire types mirror the Data API responses with every field optional,
//! so a missing field is a default rather than a parse failure. Only a page
//! without `items` is treated as malformed.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{MessageKind, MessageRecord};

/// Largest `maxResults` the live chat endpoint accepts.
pub const MAX_PAGE_SIZE: usize = 200;

// ============================================
// Wire types
// ============================================

/// Response from GET /videos?part=liveStreamingDetails
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    #[serde(default)]
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamingDetails {
    #[serde(default)]
    pub active_live_chat_id: Option<String>,
}

impl VideoListResponse {
    /// The chat handle of the first item, if the stream is live with chat on.
    pub fn active_chat_id(&self) -> Option<String> {
        self.items
            .first()
            .and_then(|item| item.live_streaming_details.as_ref())
            .and_then(|details| details.active_live_chat_id.clone())
            .filter(|id| !id.is_empty())
    }
}

/// Response from GET /liveChat/messages
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPage {
    /// `None` when the response lacks the field entirely
    #[serde(default)]
    pub items: Option<Vec<ChatItem>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatItem {
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub author_details: AuthorDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub display_message: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<MessageKind>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetails {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub is_chat_moderator: bool,
    #[serde(default)]
    pub is_chat_owner: bool,
    #[serde(default)]
    pub is_verified: bool,
}

impl ChatItem {
    /// Normalize into a [`MessageRecord`].
    ///
    /// Returns `None` for items without message text. `observed_at` stands in
    /// for a missing or unparseable `publishedAt`.
    pub fn into_record(self, observed_at: DateTime<Utc>) -> Option<MessageRecord> {
        let text = self.snippet.display_message.unwrap_or_default();
        if text.trim().is_empty() {
            return None;
        }

        let timestamp = self
            .snippet
            .published_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or(observed_at);

        let author = self.author_details;
        Some(MessageRecord {
            author: author
                .display_name
                .unwrap_or_else(|| "Unknown".to_string()),
            author_id: author.channel_id.filter(|id| !id.is_empty()),
            text,
            timestamp,
            is_moderator: author.is_chat_moderator,
            is_owner: author.is_chat_owner,
            is_verified: author.is_verified,
            kind: self.snippet.kind.unwrap_or_default(),
        })
    }
}

// ============================================
// Chat API seam
// ============================================

/// Access to the two live chat endpoints.
///
/// [`HttpChatApi`](super::HttpChatApi) talks to YouTube; tests supply scripted
/// implementations.
pub trait ChatApi {
    /// Look up the chat handle for a stream.
    ///
    /// `Ok(None)` means the stream exists but has no active chat.
    fn resolve_chat_id(&self, stream_id: &str) -> Result<Option<String>>;

    /// Fetch one page of messages.
    fn fetch_page(
        &self,
        chat_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<ChatPage>;
}

// ============================================
// Page loop
// ============================================

/// Why the page loop stopped.
#[derive(Debug)]
pub enum StopReason {
    /// The requested number of messages was collected
    TargetReached,
    /// The last page carried no continuation token
    Exhausted,
    /// An error ended collection early; messages so far are kept
    Interrupted(Error),
}

/// Result of a collection run: always the messages gathered, plus why it ended.
#[derive(Debug)]
pub struct CollectionOutcome {
    pub messages: Vec<MessageRecord>,
    pub stop: StopReason,
    /// Number of page requests issued
    pub pages_fetched: usize,
}

impl CollectionOutcome {
    fn new(messages: Vec<MessageRecord>, stop: StopReason, pages_fetched: usize) -> Self {
        Self {
            messages,
            stop,
            pages_fetched,
        }
    }

    /// The error that ended collection, if any.
    pub fn error(&self) -> Option<&Error> {
        match &self.stop {
            StopReason::Interrupted(e) => Some(e),
            _ => None,
        }
    }
}

/// Progress snapshot reported after each page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub collected: usize,
    pub target: usize,
}

impl Progress {
    /// `min(collected / target, 1.0)`; 1.0 for a zero target.
    pub fn fraction(&self) -> f64 {
        if self.target == 0 {
            return 1.0;
        }
        (self.collected as f64 / self.target as f64).min(1.0)
    }
}

/// Collects up to a target number of messages from a [`ChatApi`].
pub struct ApiCollector<'a> {
    api: &'a dyn ChatApi,
    page_delay: Duration,
}

impl<'a> ApiCollector<'a> {
    /// Create a collector with the default one second page delay.
    pub fn new(api: &'a dyn ChatApi) -> Self {
        Self {
            api,
            page_delay: Duration::from_secs(1),
        }
    }

    /// Override the fixed delay between page requests.
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Collect without progress reporting.
    pub fn collect(&self, stream_id: &str, target: usize) -> CollectionOutcome {
        self.collect_with_progress(stream_id, target, &mut |_| {})
    }

    /// Collect up to `target` messages from the stream's live chat.
    ///
    /// Never returns more than `target` messages. `on_progress` is called
    /// after every page that was received.
    pub fn collect_with_progress(
        &self,
        stream_id: &str,
        target: usize,
        on_progress: &mut dyn FnMut(Progress),
    ) -> CollectionOutcome {
        if target == 0 {
            return CollectionOutcome::new(Vec::new(), StopReason::TargetReached, 0);
        }

        let chat_id = match self.api.resolve_chat_id(stream_id) {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::warn!(stream_id, "No active live chat for stream");
                return CollectionOutcome::new(
                    Vec::new(),
                    StopReason::Interrupted(Error::ChatUnavailable(stream_id.to_string())),
                    0,
                );
            }
            Err(e) => {
                tracing::warn!(stream_id, error = %e, "Failed to resolve live chat id");
                return CollectionOutcome::new(
                    Vec::new(),
                    StopReason::Interrupted(Error::ChatUnavailable(format!(
                        "{} ({})",
                        stream_id, e
                    ))),
                    0,
                );
            }
        };

        tracing::info!(stream_id, chat_id = %chat_id, target, "Collecting live chat");

        let mut messages: Vec<MessageRecord> = Vec::with_capacity(target.min(MAX_PAGE_SIZE));
        let mut page_token: Option<String> = None;
        let mut pages_fetched = 0;

        let stop = loop {
            let remaining = target - messages.len();
            let page_size = remaining.min(MAX_PAGE_SIZE);

            pages_fetched += 1;
            let page = match self
                .api
                .fetch_page(&chat_id, page_token.as_deref(), page_size)
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(page = pages_fetched, error = %e, "Chat page request failed");
                    break StopReason::Interrupted(e);
                }
            };

            let Some(items) = page.items else {
                // Known ambiguity: a malformed page is indistinguishable from
                // the end of the chat for the caller.
                tracing::warn!(page = pages_fetched, "Chat page missing items; stopping");
                break StopReason::Interrupted(Error::MalformedPage(
                    "response has no `items` field".to_string(),
                ));
            };

            let observed_at = Utc::now();
            let received = items.len();
            messages.extend(
                items
                    .into_iter()
                    .filter_map(|item| item.into_record(observed_at))
                    .take(remaining),
            );

            tracing::debug!(
                page = pages_fetched,
                received,
                collected = messages.len(),
                "Received chat page"
            );

            on_progress(Progress {
                collected: messages.len(),
                target,
            });

            if messages.len() >= target {
                break StopReason::TargetReached;
            }

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break StopReason::Exhausted;
            }

            if !self.page_delay.is_zero() {
                std::thread::sleep(self.page_delay);
            }
        };

        tracing::info!(
            collected = messages.len(),
            pages = pages_fetched,
            stop = ?stop,
            "Chat collection finished"
        );

        CollectionOutcome::new(messages, stop, pages_fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Scripted API returning queued page results in order.
    struct ScriptedApi {
        chat_id: Option<String>,
        pages: RefCell<Vec<Result<ChatPage>>>,
        requests: RefCell<Vec<(Option<String>, usize)>>,
    }

    impl ScriptedApi {
        fn new(pages: Vec<Result<ChatPage>>) -> Self {
            Self {
                chat_id: Some("chat-1".to_string()),
                pages: RefCell::new(pages.into_iter().rev().collect()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChatApi for ScriptedApi {
        fn resolve_chat_id(&self, _stream_id: &str) -> Result<Option<String>> {
            Ok(self.chat_id.clone())
        }

        fn fetch_page(
            &self,
            _chat_id: &str,
            page_token: Option<&str>,
            max_results: usize,
        ) -> Result<ChatPage> {
            self.requests
                .borrow_mut()
                .push((page_token.map(str::to_string), max_results));
            self.pages
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Ok(ChatPage::default()))
        }
    }

    fn page(texts: &[&str], token: Option<&str>) -> ChatPage {
        let items = texts
            .iter()
            .map(|t| {
                serde_json::from_value(json!({
                    "snippet": { "displayMessage": t, "publishedAt": "2025-01-01T12:00:00Z" },
                    "authorDetails": { "displayName": "Viewer", "channelId": "UCviewer" }
                }))
                .unwrap()
            })
            .collect();
        ChatPage {
            items: Some(items),
            next_page_token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_item_defaults_for_missing_fields() {
        let observed = Utc::now();
        let item: ChatItem = serde_json::from_value(json!({
            "snippet": { "displayMessage": "hello" }
        }))
        .unwrap();
        let record = item.into_record(observed).unwrap();
        assert_eq!(record.author, "Unknown");
        assert_eq!(record.author_id, None);
        assert_eq!(record.timestamp, observed);
        assert_eq!(record.kind, MessageKind::TextMessage);
        assert!(!record.is_moderator && !record.is_owner && !record.is_verified);
    }

    #[test]
    fn test_item_without_text_is_dropped() {
        let item: ChatItem = serde_json::from_value(json!({
            "snippet": { "type": "newSponsorEvent", "displayMessage": "" },
            "authorDetails": { "displayName": "Member" }
        }))
        .unwrap();
        assert!(item.into_record(Utc::now()).is_none());
    }

    #[test]
    fn test_stops_when_tokens_run_out() {
        let api = ScriptedApi::new(vec![
            Ok(page(&["a", "b"], Some("t1"))),
            Ok(page(&["c"], None)),
        ]);
        let outcome = ApiCollector::new(&api)
            .with_page_delay(Duration::ZERO)
            .collect("stream", 10);

        assert_eq!(outcome.messages.len(), 3);
        assert!(matches!(outcome.stop, StopReason::Exhausted));
        let requests = api.requests.borrow();
        assert_eq!(requests[0], (None, 10));
        assert_eq!(requests[1], (Some("t1".to_string()), 8));
    }

    #[test]
    fn test_transport_error_keeps_partial_result() {
        let api = ScriptedApi::new(vec![
            Ok(page(&["a", "b"], Some("t1"))),
            Err(Error::Transport("connection reset".to_string())),
        ]);
        let outcome = ApiCollector::new(&api)
            .with_page_delay(Duration::ZERO)
            .collect("stream", 10);

        assert_eq!(outcome.messages.len(), 2);
        assert!(matches!(outcome.error(), Some(Error::Transport(_))));
    }

    #[test]
    fn test_malformed_page_ends_collection() {
        let api = ScriptedApi::new(vec![
            Ok(page(&["a"], Some("t1"))),
            Ok(ChatPage {
                items: None,
                next_page_token: Some("t2".to_string()),
            }),
        ]);
        let outcome = ApiCollector::new(&api)
            .with_page_delay(Duration::ZERO)
            .collect("stream", 10);

        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(outcome.pages_fetched, 2);
        assert!(matches!(outcome.error(), Some(Error::MalformedPage(_))));
    }

    #[test]
    fn test_unresolvable_chat_returns_empty() {
        let mut api = ScriptedApi::new(vec![Ok(page(&["never"], None))]);
        api.chat_id = None;
        let outcome = ApiCollector::new(&api).collect("offline", 10);

        assert!(outcome.messages.is_empty());
        assert_eq!(outcome.pages_fetched, 0);
        assert!(matches!(outcome.error(), Some(Error::ChatUnavailable(_))));
    }

    #[test]
    fn test_progress_is_monotonic_and_capped() {
        let api = ScriptedApi::new(vec![
            Ok(page(&["a", "b"], Some("t1"))),
            Ok(page(&["c", "d", "e"], Some("t2"))),
        ]);
        let mut seen = Vec::new();
        let outcome = ApiCollector::new(&api)
            .with_page_delay(Duration::ZERO)
            .collect_with_progress("stream", 4, &mut |p| seen.push(p.fraction()));

        assert_eq!(outcome.messages.len(), 4);
        assert!(matches!(outcome.stop, StopReason::TargetReached));
        assert_eq!(seen, vec![0.5, 1.0]);
    }

    #[test]
    fn test_zero_target_makes_no_requests() {
        let api = ScriptedApi::new(vec![]);
        let outcome = ApiCollector::new(&api).collect("stream", 0);
        assert!(outcome.messages.is_empty());
        assert!(api.requests.borrow().is_empty());
    }
}
