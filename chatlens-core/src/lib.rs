//! # chatlens-core
//!
//! Core library for chatlens - a YouTube live chat collector and analyzer.
//!
//! This library provides:
//! - The [`MessageRecord`] domain type shared by every stage
//! - Chat collection from the YouTube Data API, a simulator, or pasted text
//! - Descriptive statistics over a collected chat
//! - LLM-backed insight generation
//! - Configuration, logging, and CSV export
//!
//! ## Pipeline
//!
//! A run flows through three steps, strictly in sequence:
//! - **Collect:** one [`collector`] source yields an ordered `Vec<MessageRecord>`
//! - **Aggregate:** [`analytics::compute_statistics`] summarizes it (pure, no I/O)
//! - **Analyze:** [`insight::generate_insight`] sends the recent window to a completion service
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatlens_core::analytics::compute_statistics;
//! use chatlens_core::collector::manual::parse_manual_input;
//!
//! let messages = parse_manual_input("Alice: hello\nBob: hi there");
//! let stats = compute_statistics(&messages);
//! assert_eq!(stats.total_messages, 2);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod insight;
pub mod logging;
pub mod types;
