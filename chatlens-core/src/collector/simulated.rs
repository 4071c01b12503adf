//! Simulated chat for demos and offline runs.
//!
//! No network access. Output is well-formed but otherwise meaningless.

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{MessageKind, MessageRecord};

use super::synthesize_author_id;

pub const SAMPLE_AUTHORS: [&str; 10] = [
    "StreamFan123",
    "ChatMaster",
    "LiveViewer",
    "YouTubeUser",
    "VideoLover",
    "ChatBot2024",
    "StreamWatcher",
    "CommentKing",
    "ViewerPro",
    "ChatExpert",
];

pub const SAMPLE_MESSAGES: [&str; 30] = [
    "Great stream!",
    "Love this content!",
    "When will the next stream be?",
    "Amazing work!",
    "Can you explain that again?",
    "First time watching!",
    "This is so helpful",
    "What software do you use?",
    "How long have you been streaming?",
    "Can you show that part again?",
    "Love the energy!",
    "New subscriber here!",
    "What's your favorite tool?",
    "This is exactly what I needed",
    "When did you start?",
    "Do you have a tutorial for this?",
    "Can you go slower?",
    "This is confusing",
    "Great explanation!",
    "What's next?",
    "How do I get started?",
    "Thanks for sharing!",
    "This is incredible",
    "Mind blown!",
    "So cool!",
    "Awesome content",
    "Keep it up!",
    "You're the best!",
    "Learning so much",
    "Great teacher",
];

/// Oldest simulated message age, in minutes.
const MAX_AGE_MINUTES: i64 = 30;

/// Generate `count` random chat messages using the thread RNG.
pub fn simulate(count: usize) -> Vec<MessageRecord> {
    simulate_with_rng(count, &mut rand::thread_rng())
}

/// Generate `count` random chat messages from the given RNG.
///
/// Timestamps fall 1 to 30 minutes before now. A message is a moderator
/// message with a 10% gate followed by a coin flip, verified with a 5% gate
/// followed by a coin flip. Owner is never set.
pub fn simulate_with_rng<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<MessageRecord> {
    let now = Utc::now();

    (0..count)
        .map(|_| {
            let author = *SAMPLE_AUTHORS.choose(rng).unwrap_or(&SAMPLE_AUTHORS[0]);
            let text = *SAMPLE_MESSAGES.choose(rng).unwrap_or(&SAMPLE_MESSAGES[0]);
            let age = rng.gen_range(1..=MAX_AGE_MINUTES);

            MessageRecord {
                author: author.to_string(),
                author_id: Some(synthesize_author_id(author)),
                text: text.to_string(),
                timestamp: now - Duration::minutes(age),
                is_moderator: rng.gen_bool(0.1) && rng.gen_bool(0.5),
                is_owner: false,
                is_verified: rng.gen_bool(0.05) && rng.gen_bool(0.5),
                kind: MessageKind::TextMessage,
            }
        })
        .collect()
}
