//! Manual chat input: one `Author: message` per line.

use chrono::{DateTime, Duration, Utc};

use crate::types::MessageRecord;

use super::synthesize_author_id;

/// Parse pasted chat text using the current time as the final timestamp.
pub fn parse_manual_input(input: &str) -> Vec<MessageRecord> {
    parse_manual_input_at(input, Utc::now())
}

/// Parse pasted chat text.
///
/// A line with a colon splits on the first one into author and text; a line
/// without becomes `User<n>` (1-based line number). Lines with no text are
/// dropped but still count toward line numbers. Timestamps are one minute
/// apart in line order, the last line stamped `now`.
pub fn parse_manual_input_at(input: &str, now: DateTime<Utc>) -> Vec<MessageRecord> {
    let lines: Vec<&str> = input
        .trim()
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect();
    let line_count = lines.len() as i64;

    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let (author, text) = match line.split_once(':') {
                Some((author, text)) => (author.trim().to_string(), text.trim()),
                None => (format!("User{}", i + 1), line.trim()),
            };

            if text.is_empty() {
                return None;
            }

            let timestamp = now - Duration::minutes(line_count - 1 - i as i64);
            let author_id = Some(synthesize_author_id(&author));
            Some(MessageRecord::text_message(author, author_id, text, timestamp))
        })
        .collect()
}
