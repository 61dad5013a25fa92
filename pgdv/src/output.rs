//! Report rendering for the terminal and for machines

use serde_json::json;

use crate::report::Report;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Human-readable listing, one line per verdict plus a summary
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    for db in &report.databases {
        out.push_str(&format!("Database: {}\n", db.name));
        if db.verdicts.is_empty() {
            out.push_str("  (no checks)\n");
        }
        for verdict in &db.verdicts {
            let mut lines = verdict.message.lines();
            out.push_str(&format!(
                "  [{}] {}: {}\n",
                verdict.outcome,
                verdict.label(),
                lines.next().unwrap_or("")
            ));
            for line in lines {
                out.push_str(&format!("      {}\n", line));
            }
        }
    }

    let summary = report.summary();
    out.push_str(&format!(
        "Summary: {} checks across {} database(s), {} passed, {} failed. Overall: {}\n",
        summary.total,
        summary.databases,
        summary.passed,
        summary.failed,
        report.outcome()
    ));
    out
}

/// Pretty-printed JSON document with the overall outcome and summary on top
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    let document = json!({
        "outcome": report.outcome(),
        "passed": report.passed(),
        "summary": report.summary(),
        "started_at": report.started_at,
        "finished_at": report.finished_at,
        "databases": report.databases,
    });
    serde_json::to_string_pretty(&document)
}
