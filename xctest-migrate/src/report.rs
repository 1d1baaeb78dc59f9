use colored::Colorize;

use crate::batch::{BatchSummary, FileOutcome};

/// Render a batch summary for terminal output.
pub fn render_batch_text(summary: &BatchSummary) -> String {
    let mut out = Vec::new();
    let title = if summary.dry_run {
        "Migration results (dry run):"
    } else {
        "Migration results:"
    };
    out.push(title.bold().to_string());

    for file in &summary.files {
        let path = file.path.display();
        let line = match &file.outcome {
            FileOutcome::Converted => format!("  Converted: {path}").green(),
            FileOutcome::AlreadyMigrated => format!("  Already migrated: {path}").yellow(),
            FileOutcome::Unsupported { reason } => {
                format!("  Unsupported: {path} ({reason})").red()
            }
        };
        out.push(line.to_string());
    }

    out.push(String::new());
    out.push(
        format!(
            "Summary: {} converted, {} already migrated, {} unsupported",
            summary.converted, summary.already_migrated, summary.unsupported
        )
        .cyan()
        .to_string(),
    );
    out.join("\n")
}

/// Render a batch summary as pretty JSON.
pub fn render_batch_json(summary: &BatchSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}
