//! LLM-backed chat insight.
//!
//! The most recent [`TRANSCRIPT_WINDOW`] messages are rendered as
//! `author: text` lines, wrapped in the template for the chosen
//! [`AnalysisMode`], and sent to a [`CompletionClient`] in one blocking call.
//! There is no retry.
//!
//! [`generate_insight`] keeps failures typed. [`insight_text`] flattens them
//! into a readable message for display, which is how the CLI shows them.

mod client;
mod prompts;

pub use client::{create_completion_client, HttpCompletionClient};

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::MessageRecord;

/// Number of most recent messages included in a prompt.
pub const TRANSCRIPT_WINDOW: usize = 300;

/// Returned without calling the service when there is nothing to analyze.
pub const NO_MESSAGES_TEXT: &str = "No messages to analyze";

/// Completion interface used by the insight generator.
pub trait CompletionClient: Send + Sync {
    /// Send one system instruction and one user prompt, return the reply text.
    fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Which analysis to ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnalysisMode {
    /// Themes, questions, sentiment, moments, engagement and feedback
    #[default]
    Comprehensive,
    /// Questions asked by viewers
    Questions,
    /// Emotional tone and engagement
    Sentiment,
    /// Main topics and how they evolve
    Themes,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 4] = [
        AnalysisMode::Comprehensive,
        AnalysisMode::Questions,
        AnalysisMode::Sentiment,
        AnalysisMode::Themes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Comprehensive => "comprehensive",
            AnalysisMode::Questions => "questions",
            AnalysisMode::Sentiment => "sentiment",
            AnalysisMode::Themes => "themes",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            AnalysisMode::Comprehensive => prompts::COMPREHENSIVE,
            AnalysisMode::Questions => prompts::QUESTIONS,
            AnalysisMode::Sentiment => prompts::SENTIMENT,
            AnalysisMode::Themes => prompts::THEMES,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "comprehensive" => Ok(AnalysisMode::Comprehensive),
            "questions" => Ok(AnalysisMode::Questions),
            "sentiment" => Ok(AnalysisMode::Sentiment),
            "themes" => Ok(AnalysisMode::Themes),
            _ => Err(format!(
                "unknown analysis mode: {} (expected one of: {})",
                s,
                AnalysisMode::ALL.map(|m| m.as_str()).join(", ")
            )),
        }
    }
}

/// Render the transcript window as `author: text` lines.
pub fn format_transcript(messages: &[MessageRecord]) -> String {
    let start = messages.len().saturating_sub(TRANSCRIPT_WINDOW);
    messages[start..]
        .iter()
        .map(|m| format!("{}: {}", m.author, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user prompt for a mode.
pub fn build_prompt(messages: &[MessageRecord], mode: AnalysisMode) -> String {
    mode.template()
        .replace(prompts::TRANSCRIPT_PLACEHOLDER, &format_transcript(messages))
}

/// Ask the completion service for an analysis of the chat.
///
/// An empty chat short-circuits to [`NO_MESSAGES_TEXT`]. Any failure is
/// reported as [`Error::AnalysisService`].
pub fn generate_insight(
    messages: &[MessageRecord],
    mode: AnalysisMode,
    client: &dyn CompletionClient,
) -> Result<String> {
    if messages.is_empty() {
        return Ok(NO_MESSAGES_TEXT.to_string());
    }

    let prompt = build_prompt(messages, mode);
    let prompt_hash = hex::encode(Sha256::digest(prompt.as_bytes()));
    tracing::info!(
        mode = %mode,
        messages = messages.len().min(TRANSCRIPT_WINDOW),
        prompt_hash = &prompt_hash[..12],
        "Requesting chat insight"
    );

    match client.complete(prompts::SYSTEM_PROMPT, &prompt) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::warn!(error = %e, "Chat insight failed");
            Err(match e {
                Error::AnalysisService(_) => e,
                other => Error::AnalysisService(other.to_string()),
            })
        }
    }
}

/// Flatten an insight result into display text.
///
/// Errors become `"Error analyzing chat: ..."`, indistinguishable from a
/// successful analysis without inspecting the text. A service error shows
/// only its own message.
pub fn insight_text(result: Result<String>) -> String {
    match result {
        Ok(text) => text,
        Err(Error::AnalysisService(msg)) => format!("Error analyzing chat: {}", msg),
        Err(e) => format!("Error analyzing chat: {}", e),
    }
}

/// [`generate_insight`] followed by [`insight_text`].
pub fn analyze_chat(
    messages: &[MessageRecord],
    mode: AnalysisMode,
    client: &dyn CompletionClient,
) -> String {
    insight_text(generate_insight(messages, mode, client))
}
