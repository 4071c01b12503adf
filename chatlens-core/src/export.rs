//! CSV export of collected messages.
//!
//! One row per message, one column per field, in collection order.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat};

use crate::error::Result;
use crate::types::MessageRecord;

/// Column headers, in row order.
pub const CSV_HEADERS: [&str; 8] = [
    "author",
    "message",
    "timestamp",
    "author_channel_id",
    "is_moderator",
    "is_owner",
    "is_verified",
    "message_type",
];

/// Default export file name, e.g. `youtube_chat_analysis_20250301_142501.csv`.
pub fn default_export_filename(now: DateTime<Local>) -> String {
    format!("youtube_chat_analysis_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Write messages as CSV to any writer.
pub fn write_csv<W: Write>(messages: &[MessageRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;

    for msg in messages {
        let timestamp = msg.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        csv.write_record([
            msg.author.as_str(),
            msg.text.as_str(),
            timestamp.as_str(),
            msg.author_id.as_deref().unwrap_or(""),
            bool_str(msg.is_moderator),
            bool_str(msg.is_owner),
            bool_str(msg.is_verified),
            msg.kind.as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write messages as CSV to a file, creating parent directories.
pub fn export_csv(messages: &[MessageRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_csv(messages, file)?;
    tracing::info!(path = %path.display(), rows = messages.len(), "Exported chat CSV");
    Ok(())
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
