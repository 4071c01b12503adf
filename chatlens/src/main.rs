//! chatlens - YouTube live chat analyzer
//!
//! Collects chat from one source, prints statistics and an LLM analysis,
//! and optionally exports the raw messages as CSV.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/chatlens/config.toml (~/.config/chatlens/config.toml)
//! - Logs: $XDG_STATE_HOME/chatlens/chatlens.<date>.log (~/.local/state/chatlens/)
//!
//! API keys are read from the config file or the environment; a `.env` file in
//! the working directory is loaded first.

mod report;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chatlens_core::collector::{
    extract_stream_id, manual, simulated, ApiCollector, HttpChatApi, StopReason,
};
use chatlens_core::export::{default_export_filename, export_csv};
use chatlens_core::insight::{analyze_chat, create_completion_client, insight_text, AnalysisMode};
use chatlens_core::{Config, MessageRecord};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use crate::report::Report;

#[derive(Parser)]
#[command(name = "chatlens")]
#[command(about = "Collect and analyze YouTube live chat")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    source: Source,

    /// Analysis type: comprehensive, questions, sentiment or themes
    #[arg(short, long, global = true, default_value = "comprehensive")]
    mode: AnalysisMode,

    /// Write the collected messages as CSV (a directory, or a path ending in `/`,
    /// gets a timestamped file name)
    #[arg(short, long, global = true, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Skip the LLM analysis
    #[arg(long, global = true)]
    no_insight: bool,

    /// Also print a sample of the collected messages
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Source {
    /// Collect from a live stream with the YouTube Data API
    Api {
        /// Live stream URL (watch?v=, youtu.be/, embed/ or live/)
        url: String,

        /// Maximum messages to collect
        #[arg(
            short = 'n',
            long,
            default_value_t = 100,
            value_parser = clap::value_parser!(u16).range(1..=500)
        )]
        max_messages: u16,
    },

    /// Generate simulated chat (no API key needed for collection)
    Demo {
        /// Number of sample messages
        #[arg(
            short = 'n',
            long,
            default_value_t = 50,
            value_parser = clap::value_parser!(u16).range(1..=200)
        )]
        count: u16,
    },

    /// Parse `Username: message` lines from a file or stdin
    Manual {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

const NO_MESSAGES_HELP: &str = "\
No messages collected. This could be because:
  - The stream is not currently live
  - Chat is disabled for this stream
  - The video is private/unlisted
  - YouTube API quota exceeded

Try `chatlens demo` to test the analysis features.";

fn main() -> Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        chatlens_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("chatlens starting");

    // The completion key gates the whole run, before anything is collected.
    config
        .llm
        .require_api_key()
        .context("an LLM API key is required to run chatlens")?;

    if config.youtube.resolve_api_key().is_none() {
        eprintln!("warning: YouTube API key not found; the `api` source is disabled");
    }

    let Some(messages) = collect(&args.source, &config)? else {
        return Ok(());
    };

    let insight = if args.no_insight {
        None
    } else {
        Some(run_insight(&messages, args.mode, &config))
    };

    let report = Report::new(&messages, args.mode, insight);
    match args.format {
        OutputFormat::Text => print!("{}", report.render_text(&messages, args.verbose)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        ),
    }

    if let Some(path) = &args.export {
        let path = resolve_export_path(path)
            .with_context(|| format!("failed to create export directory {}", path.display()))?;
        export_csv(&messages, &path)
            .with_context(|| format!("failed to export CSV to {}", path.display()))?;
        eprintln!("Exported {} messages to {}", messages.len(), path.display());
    }

    tracing::info!(messages = messages.len(), "chatlens complete");
    Ok(())
}

/// Run the selected source.
///
/// `Ok(None)` means nothing usable was collected; the reason has already been
/// printed and the run ends without error.
fn collect(source: &Source, config: &Config) -> Result<Option<Vec<MessageRecord>>> {
    let messages = match source {
        Source::Api { url, max_messages } => {
            let stream_id = match extract_stream_id(url) {
                Ok(id) => id,
                Err(e) => {
                    eprintln!("error: {e}. Please check the URL format.");
                    return Ok(None);
                }
            };
            eprintln!("Video ID extracted: {stream_id}");

            let messages = match HttpChatApi::new(&config.youtube) {
                Ok(api) => collect_live(&api, &stream_id, usize::from(*max_messages), config),
                Err(e) => {
                    eprintln!("error: {e}");
                    Vec::new()
                }
            };
            if messages.is_empty() {
                eprintln!("{NO_MESSAGES_HELP}");
                return Ok(None);
            }
            messages
        }
        Source::Demo { count } => {
            let messages = simulated::simulate(usize::from(*count));
            eprintln!("Generated {} simulated messages", messages.len());
            messages
        }
        Source::Manual { file } => {
            let input = read_input(file.as_deref())?;
            let messages = manual::parse_manual_input(&input);
            eprintln!("{} messages processed", messages.len());
            messages
        }
    };

    if messages.is_empty() {
        eprintln!("No messages in input");
        return Ok(None);
    }
    Ok(Some(messages))
}

/// Page through a live chat with a progress bar.
fn collect_live(
    api: &HttpChatApi,
    stream_id: &str,
    target: usize,
    config: &Config,
) -> Vec<MessageRecord> {
    let pb = ProgressBar::new(target as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("collecting messages...");

    let outcome = ApiCollector::new(api)
        .with_page_delay(Duration::from_millis(config.youtube.page_delay_ms))
        .collect_with_progress(stream_id, target, &mut |progress| {
            pb.set_position(progress.collected as u64);
        });

    pb.finish_and_clear();

    match &outcome.stop {
        StopReason::Interrupted(e) => eprintln!(
            "error collecting chat: {e}\nSee {} for details",
            chatlens_core::logging::log_file_path().display()
        ),
        StopReason::TargetReached | StopReason::Exhausted => {}
    }
    eprintln!(
        "Collection complete! Collected {} messages",
        outcome.messages.len()
    );

    outcome.messages
}

fn run_insight(messages: &[MessageRecord], mode: AnalysisMode, config: &Config) -> String {
    match create_completion_client(&config.llm) {
        Ok(client) => analyze_chat(messages, mode, client.as_ref()),
        Err(e) => insight_text(Err(e)),
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// A directory export path gets the default timestamped file name.
///
/// A path ending in a separator names a directory even before it exists; it
/// is created here.
fn resolve_export_path(path: &Path) -> std::io::Result<PathBuf> {
    let names_dir = path
        .as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator);
    if names_dir {
        std::fs::create_dir_all(path)?;
    }
    if names_dir || path.is_dir() {
        Ok(path.join(default_export_filename(chrono::Local::now())))
    } else {
        Ok(path.to_path_buf())
    }
}
