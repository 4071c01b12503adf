//! Stream id extraction from YouTube URLs.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Patterns tried in order; the first capture group is the stream id.
fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
            r"youtube\.com/live/([^&\n?#]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("stream id pattern must compile"))
        .collect()
    })
}

/// Extract the video/stream id from a YouTube URL.
///
/// Accepts `watch?v=`, `youtu.be/`, `embed/` and `live/` forms. The id runs
/// until `&`, `?`, `#` or a newline.
pub fn extract_stream_id(url: &str) -> Result<String> {
    patterns()
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}
