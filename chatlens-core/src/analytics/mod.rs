//! Analytics module for chatlens
//!
//! Pure functions over a collected chat:
//! - [`compute_statistics`]: counts, per-author frequency, average length
//! - [`message_timeline`]: messages per minute
//!
//! Neither touches the network or mutates its input.

pub mod stats;
pub mod timeline;

pub use stats::{compute_statistics, AuthorCount, ChatStatistics, TOP_AUTHOR_LIMIT};
pub use timeline::{message_timeline, TimelineBucket};
