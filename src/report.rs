use std::fmt::Write;

use crate::record::{FailureRecord, HistoryStatus};

/// Markers rendered for per-record resolution failures so the report stays
/// actionable even when individual lookups fail.
pub const NAME_UNRESOLVED_MARKER: &str = "(source name unresolved)";
pub const FILE_NOT_FOUND_MARKER: &str = "(not found in content-test tree)";
pub const HISTORY_UNAVAILABLE_MARKER: &str = "(history unavailable)";
pub const HISTORY_NOT_QUERIED_MARKER: &str = "(history not queried)";

const REPRO_COMMAND: &str = "cts-tradefed run cts --class android.webkitsecurity.cts.";

/// Render the consolidated report.
///
/// Pure and deterministic: output depends only on the records (in the order
/// presented), the diagnostics text, and the changeset base URL.
pub fn render(records: &[FailureRecord], diagnostics: &str, changeset_url: &str) -> String {
    let mut out = String::new();
    for record in records {
        render_record(&mut out, record, changeset_url);
    }
    out.push('\n');
    out.push_str(diagnostics);
    out.push('\n');
    out
}

fn render_record(out: &mut String, record: &FailureRecord, changeset_url: &str) {
    let name = &record.generated_name;
    let _ = writeln!(out, "{name}");
    let _ = writeln!(out, "{}", "=".repeat(name.len()));
    out.push('\n');

    section(out, "to reproduce");
    let _ = writeln!(out, "\t{REPRO_COMMAND}{name}");
    out.push('\n');

    section(out, "test case");
    match (&record.case_text, &record.content_test_name) {
        (Some(text), _) => {
            for line in text.lines() {
                let _ = writeln!(out, "\t{line}");
            }
        }
        (None, Some(_)) => {
            let _ = writeln!(out, "\t{FILE_NOT_FOUND_MARKER}");
        }
        (None, None) => {
            let _ = writeln!(out, "\t{NAME_UNRESOLVED_MARKER}");
        }
    }
    out.push('\n');

    section(out, "revisions");
    match record.history {
        HistoryStatus::Fetched => {
            for revision in &record.revisions {
                let number = revision.strip_prefix('r').unwrap_or(revision);
                let _ = writeln!(out, "\t[{revision}] ({changeset_url}{number})");
            }
        }
        HistoryStatus::Failed => {
            let _ = writeln!(out, "\t{HISTORY_UNAVAILABLE_MARKER}");
        }
        HistoryStatus::Pending => {
            let _ = writeln!(out, "\t{HISTORY_NOT_QUERIED_MARKER}");
        }
    }
    out.push('\n');
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\t{title}");
    let _ = writeln!(out, "\t{}", "-".repeat(title.len()));
}
