//! Report assembly and rendering.

use std::fmt::Write;

use chatlens_core::analytics::{
    compute_statistics, message_timeline, ChatStatistics, TimelineBucket,
};
use chatlens_core::insight::AnalysisMode;
use chatlens_core::MessageRecord;
use serde::Serialize;

/// Width of the longest bar in text charts.
const BAR_WIDTH: usize = 30;

/// Messages shown with `--verbose`.
const SAMPLE_SIZE: usize = 20;

/// Everything printed for one run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub statistics: ChatStatistics,
    pub timeline: Vec<TimelineBucket>,
    pub analysis_mode: String,
    /// `None` when analysis was skipped
    pub insight: Option<String>,
}

impl Report {
    pub fn new(messages: &[MessageRecord], mode: AnalysisMode, insight: Option<String>) -> Self {
        Self {
            statistics: compute_statistics(messages),
            timeline: message_timeline(messages),
            analysis_mode: mode.to_string(),
            insight,
        }
    }

    /// Render the report for a terminal.
    pub fn render_text(&self, messages: &[MessageRecord], verbose: bool) -> String {
        let stats = &self.statistics;
        let mut out = String::new();

        let _ = writeln!(out, "Chat Statistics");
        let _ = writeln!(out, "  Total Messages       {}", stats.total_messages);
        let _ = writeln!(out, "  Unique Users         {}", stats.unique_authors);
        let _ = writeln!(out, "  Avg Messages/User    {:.1}", stats.avg_messages_per_author);
        let _ = writeln!(out, "  Avg Message Length   {:.1}", stats.avg_message_length);
        let _ = writeln!(out, "  Moderator Messages   {}", stats.moderator_count);
        let _ = writeln!(out, "  Owner Messages       {}", stats.owner_count);
        let _ = writeln!(out, "  Verified Messages    {}", stats.verified_count);

        if !stats.top_authors.is_empty() {
            let _ = writeln!(out, "\nMost Active Chatters");
            let rows: Vec<_> = stats
                .top_authors
                .iter()
                .map(|a| (a.author.clone(), a.count))
                .collect();
            render_bars(&mut out, &rows);
        }

        if let Some(insight) = &self.insight {
            let _ = writeln!(out, "\nAnalysis ({})", self.analysis_mode);
            let _ = writeln!(out, "{}", insight.trim_end());
        }

        if messages.len() > 1 && self.timeline.len() > 1 {
            let _ = writeln!(out, "\nMessages per Minute");
            let rows: Vec<_> = self
                .timeline
                .iter()
                .map(|b| (b.minute.format("%H:%M").to_string(), b.message_count))
                .collect();
            render_bars(&mut out, &rows);
        }

        if verbose {
            let _ = writeln!(out, "\nSample Messages");
            for msg in messages.iter().take(SAMPLE_SIZE) {
                let _ = writeln!(
                    out,
                    "  [{}] {}: {}",
                    msg.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    msg.author,
                    msg.text
                );
            }
        }

        out
    }
}

/// Horizontal bar chart, bars scaled to the largest value.
fn render_bars(out: &mut String, rows: &[(String, usize)]) {
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);

    for (label, value) in rows {
        let len = (value * BAR_WIDTH + max - 1) / max;
        let _ = writeln!(
            out,
            "  {:<width$}  {} {}",
            label,
            "#".repeat(len),
            value,
            width = label_width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlens_core::collector::manual::parse_manual_input;

    #[test]
    fn test_text_report_sections() {
        let messages = parse_manual_input("Alice: hello\nBob: hi there\nAlice: again");
        let report = Report::new(&messages, AnalysisMode::Themes, Some("Insightful.".into()));
        let text = report.render_text(&messages, true);

        assert!(text.contains("Total Messages       3"));
        assert!(text.contains("Most Active Chatters"));
        assert!(text.contains("Analysis (themes)"));
        assert!(text.contains("Insightful."));
        assert!(text.contains("Messages per Minute"));
        assert!(text.contains("Alice: again"));
    }

    #[test]
    fn test_bars_scale_to_max() {
        let mut out = String::new();
        render_bars(&mut out, &[("a".into(), 10), ("bb".into(), 5)]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], format!("  a   {} 10", "#".repeat(30)));
        assert_eq!(lines[1], format!("  bb  {} 5", "#".repeat(15)));
    }

    #[test]
    fn test_skipped_insight_is_null_in_json() {
        let messages = parse_manual_input("Solo: one");
        let report = Report::new(&messages, AnalysisMode::Comprehensive, None);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["insight"].is_null());
        assert_eq!(json["statistics"]["total_messages"], 1);
    }
}
