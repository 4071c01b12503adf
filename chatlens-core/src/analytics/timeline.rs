//! Messages-per-minute timeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::Serialize;

use crate::types::MessageRecord;

/// Message count for one minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBucket {
    /// Start of the minute
    pub minute: DateTime<Utc>,
    pub message_count: usize,
}

/// Count messages per minute, oldest minute first.
///
/// Only minutes that contain at least one message appear.
pub fn message_timeline(messages: &[MessageRecord]) -> Vec<TimelineBucket> {
    let mut buckets: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
    for msg in messages {
        let minute = msg
            .timestamp
            .duration_trunc(Duration::minutes(1))
            .unwrap_or(msg.timestamp);
        *buckets.entry(minute).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(minute, message_count)| TimelineBucket {
            minute,
            message_count,
        })
        .collect()
}
