//! Descriptive chat statistics.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::MessageRecord;

/// Number of authors kept in [`ChatStatistics::top_authors`].
pub const TOP_AUTHOR_LIMIT: usize = 10;

/// Summary of a collected chat.
///
/// Every field is defined (no NaN) for an empty chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatStatistics {
    pub total_messages: usize,
    /// Distinct author ids (display name for records without one)
    pub unique_authors: usize,
    pub avg_messages_per_author: f64,
    pub moderator_count: usize,
    pub owner_count: usize,
    pub verified_count: usize,
    /// Most active authors by display name, highest count first
    pub top_authors: Vec<AuthorCount>,
    /// Mean message length in characters
    pub avg_message_length: f64,
}

/// One entry of the most-active-authors ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

/// Compute [`ChatStatistics`] for a sequence of messages.
pub fn compute_statistics(messages: &[MessageRecord]) -> ChatStatistics {
    let total_messages = messages.len();
    if total_messages == 0 {
        return ChatStatistics::default();
    }

    let unique_authors = messages
        .iter()
        .map(MessageRecord::author_key)
        .collect::<HashSet<_>>()
        .len();

    let total_chars: usize = messages.iter().map(MessageRecord::char_len).sum();

    ChatStatistics {
        total_messages,
        unique_authors,
        avg_messages_per_author: total_messages as f64 / unique_authors as f64,
        moderator_count: messages.iter().filter(|m| m.is_moderator).count(),
        owner_count: messages.iter().filter(|m| m.is_owner).count(),
        verified_count: messages.iter().filter(|m| m.is_verified).count(),
        top_authors: top_authors(messages, TOP_AUTHOR_LIMIT),
        avg_message_length: total_chars as f64 / total_messages as f64,
    }
}

/// Rank authors by message count, ties broken by first appearance.
fn top_authors(messages: &[MessageRecord], limit: usize) -> Vec<AuthorCount> {
    // author -> (first index, count)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, msg) in messages.iter().enumerate() {
        counts.entry(msg.author.as_str()).or_insert((idx, 0)).1 += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|(_, (first_a, count_a)), (_, (first_b, count_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(author, (_, count))| AuthorCount {
            author: author.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn msg(author: &str, text: &str) -> MessageRecord {
        MessageRecord::text_message(author, None, text, Utc::now())
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.total_messages, 0);
        assert_eq!(stats.unique_authors, 0);
        assert_eq!(stats.avg_messages_per_author, 0.0);
        assert_eq!(stats.avg_message_length, 0.0);
        assert!(stats.top_authors.is_empty());
    }

    #[test]
    fn test_basic_counts() {
        let mut messages = vec![msg("A", "abcd"), msg("B", "ab"), msg("A", "abcdef")];
        messages[1].is_moderator = true;
        messages[2].is_verified = true;
        messages[2].is_moderator = true;

        let stats = compute_statistics(&messages);
        assert_eq!(stats.total_messages, 3);
        assert_eq!(stats.unique_authors, 2);
        assert!((stats.avg_messages_per_author - 1.5).abs() < f64::EPSILON);
        assert_eq!(stats.moderator_count, 2);
        assert_eq!(stats.verified_count, 1);
        assert_eq!(stats.owner_count, 0);
        assert!((stats.avg_message_length - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unique_authors_uses_id_when_present() {
        let now = Utc::now();
        let messages = vec![
            MessageRecord::text_message("Sam", Some("UC1".into()), "x", now),
            MessageRecord::text_message("Sam", Some("UC2".into()), "x", now),
            MessageRecord::text_message("Renamed", Some("UC1".into()), "x", now),
        ];
        assert_eq!(compute_statistics(&messages).unique_authors, 2);
    }

    #[test]
    fn test_top_authors_tie_break_by_first_appearance() {
        let mut messages = Vec::new();
        messages.push(msg("C", "x"));
        for _ in 0..5 {
            messages.push(msg("A", "x"));
        }
        for _ in 0..5 {
            messages.push(msg("B", "x"));
        }
        messages.push(msg("C", "x"));
        messages.push(msg("C", "x"));

        let top = compute_statistics(&messages).top_authors;
        let ranked: Vec<_> = top.iter().map(|a| (a.author.as_str(), a.count)).collect();
        assert_eq!(ranked, vec![("A", 5), ("B", 5), ("C", 3)]);
    }

    #[test]
    fn test_top_authors_capped_and_sorted() {
        let messages: Vec<_> = (0..25)
            .flat_map(|i| (0..=i % 7).map(move |_| msg(&format!("user{i}"), "hey")))
            .collect();

        let top = compute_statistics(&messages).top_authors;
        assert_eq!(top.len(), TOP_AUTHOR_LIMIT);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_statistics_are_deterministic() {
        let messages = vec![msg("A", "one"), msg("B", "two"), msg("B", "three")];
        assert_eq!(compute_statistics(&messages), compute_statistics(&messages));
    }
}
