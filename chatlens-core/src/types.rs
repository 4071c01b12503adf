//! Core domain types for chatlens
//!
//! Every collection source normalizes into [`MessageRecord`], and every later
//! stage (statistics, insight, export) reads that type and nothing else.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Stream** | A YouTube video that is (or was) broadcast live |
//! | **Handle** | The `activeLiveChatId` of a stream's live chat session |
//! | **Page** | One response of the live chat messages endpoint (up to 200 items) |
//! | **Continuation token** | `nextPageToken`, the cursor for the next page |
//! | **Author** | The display name attached to a message; not unique |
//! | **Author id** | The author's channel id; stable but not always available |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Message Record
// ============================================

/// One chat message and its metadata.
///
/// Records are created only by the collector and are never mutated afterward;
/// later stages borrow them as `&[MessageRecord]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Display name of the author
    pub author: String,
    /// Opaque author identifier (channel id), when the source has one
    pub author_id: Option<String>,
    /// Message body, never empty
    pub text: String,
    /// When the message was published
    pub timestamp: DateTime<Utc>,
    pub is_moderator: bool,
    pub is_owner: bool,
    pub is_verified: bool,
    /// Event type reported by the source
    #[serde(default)]
    pub kind: MessageKind,
}

impl MessageRecord {
    /// Create a plain text message with no role flags set.
    pub fn text_message(
        author: impl Into<String>,
        author_id: Option<String>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            author: author.into(),
            author_id,
            text: text.into(),
            timestamp,
            is_moderator: false,
            is_owner: false,
            is_verified: false,
            kind: MessageKind::TextMessage,
        }
    }

    /// The key used to tell authors apart: the author id when present,
    /// otherwise the display name.
    pub fn author_key(&self) -> &str {
        self.author_id.as_deref().unwrap_or(&self.author)
    }

    /// Message length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

// ============================================
// Message Kind
// ============================================

/// Type of chat event, as reported in `snippet.type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Ordinary text message
    #[default]
    #[serde(rename = "textMessageEvent")]
    TextMessage,
    /// Paid highlighted message
    #[serde(rename = "superChatEvent")]
    SuperChat,
    /// Paid sticker
    #[serde(rename = "superStickerEvent")]
    SuperSticker,
    /// New channel member
    #[serde(rename = "newSponsorEvent")]
    NewSponsor,
    /// Membership anniversary message
    #[serde(rename = "memberMilestoneChatEvent")]
    MemberMilestone,
    /// A viewer gifted memberships
    #[serde(rename = "membershipGiftingEvent")]
    MembershipGifting,
    /// A viewer received a gifted membership
    #[serde(rename = "giftMembershipReceivedEvent")]
    GiftMembershipReceived,
    /// Any event type not listed above
    #[serde(rename = "other", other)]
    Other,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::TextMessage => "textMessageEvent",
            MessageKind::SuperChat => "superChatEvent",
            MessageKind::SuperSticker => "superStickerEvent",
            MessageKind::NewSponsor => "newSponsorEvent",
            MessageKind::MemberMilestone => "memberMilestoneChatEvent",
            MessageKind::MembershipGifting => "membershipGiftingEvent",
            MessageKind::GiftMembershipReceived => "giftMembershipReceivedEvent",
            MessageKind::Other => "other",
        }
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textMessageEvent" => Ok(MessageKind::TextMessage),
            "superChatEvent" => Ok(MessageKind::SuperChat),
            "superStickerEvent" => Ok(MessageKind::SuperSticker),
            "newSponsorEvent" => Ok(MessageKind::NewSponsor),
            "memberMilestoneChatEvent" => Ok(MessageKind::MemberMilestone),
            "membershipGiftingEvent" => Ok(MessageKind::MembershipGifting),
            "giftMembershipReceivedEvent" => Ok(MessageKind::GiftMembershipReceived),
            "other" => Ok(MessageKind::Other),
            _ => Err(format!("unknown message kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_key_prefers_id() {
        let now = Utc::now();
        let with_id = MessageRecord::text_message("Alice", Some("UC1".to_string()), "hi", now);
        let without_id = MessageRecord::text_message("Alice", None, "hi", now);
        assert_eq!(with_id.author_key(), "UC1");
        assert_eq!(without_id.author_key(), "Alice");
    }

    #[test]
    fn test_char_len_counts_characters() {
        let msg = MessageRecord::text_message("A", None, "héllo 👋", Utc::now());
        assert_eq!(msg.char_len(), 7);
    }

    #[test]
    fn test_message_kind_wire_names() {
        let kind: MessageKind = serde_json::from_str("\"superChatEvent\"").unwrap();
        assert_eq!(kind, MessageKind::SuperChat);

        let unknown: MessageKind = serde_json::from_str("\"pollEvent\"").unwrap();
        assert_eq!(unknown, MessageKind::Other);

        assert_eq!(
            "newSponsorEvent".parse::<MessageKind>(),
            Ok(MessageKind::NewSponsor)
        );
        assert!("bogus".parse::<MessageKind>().is_err());
        assert_eq!(MessageKind::default().as_str(), "textMessageEvent");
    }
}
