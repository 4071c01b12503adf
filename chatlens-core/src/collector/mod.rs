//! Chat collection
//!
//! Three interchangeable sources produce an ordered `Vec<MessageRecord>`:
//!
//! - [`youtube`]: the YouTube Data API live chat endpoints, paged until the
//!   requested count is reached or the stream runs out of pages
//! - [`simulated`]: random messages from a fixed vocabulary, for offline demos
//! - [`manual`]: pasted `Author: message` lines
//!
//! Collection never fails outright. Remote errors end the page loop and the
//! messages gathered so far are returned in a [`CollectionOutcome`].

mod client;
pub mod manual;
pub mod simulated;
mod url;
pub mod youtube;

pub use client::HttpChatApi;
pub use url::extract_stream_id;
pub use youtube::{ApiCollector, ChatApi, CollectionOutcome, Progress, StopReason};

use sha2::{Digest, Sha256};

/// Size of the id space for synthesized author ids.
const AUTHOR_ID_SPACE: u64 = 1_000_000;

/// Derive a stable pseudo channel id (`UC<n>`) from an author name.
///
/// Used by sources that have no real channel ids. Distinct names may collide;
/// that is accepted.
pub fn synthesize_author_id(author: &str) -> String {
    let digest = Sha256::digest(author.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    format!("UC{}", u64::from_be_bytes(prefix) % AUTHOR_ID_SPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_author_id_is_stable() {
        let a = synthesize_author_id("StreamFan123");
        let b = synthesize_author_id("StreamFan123");
        assert_eq!(a, b);
        assert!(a.starts_with("UC"));
        let n: u64 = a[2..].parse().unwrap();
        assert!(n < AUTHOR_ID_SPACE);
    }
}
