//! Plain-text rendering of job records for the terminal.

use vidgen_core::job::{JobRecord, TaskSnapshot};

use crate::watch::pending_count;

/// One line per record: id, status, creation time, then whatever detail
/// the status carries (progress, output locators, failure reason).
pub fn record_line(record: &JobRecord) -> String {
    let mut line = format!(
        "{:<40} {:<10} {}",
        record.id,
        record.status,
        record.created_at.format("%Y-%m-%d %H:%M:%S"),
    );
    push_detail(
        &mut line,
        record.is_terminal(),
        record.progress,
        &record.output,
        record.failure.as_deref(),
    );
    line
}

/// Same layout as [`record_line`] for a live lookup.
pub fn snapshot_line(snapshot: &TaskSnapshot) -> String {
    let mut line = format!("{:<40} {:<10}", snapshot.id, snapshot.status);
    push_detail(
        &mut line,
        snapshot.status.is_terminal(),
        snapshot.progress,
        &snapshot.output,
        snapshot.failure.as_deref(),
    );
    line
}

/// e.g. `2/3 jobs settled`.
pub fn summary_line(records: &[JobRecord]) -> String {
    let settled = records.len() - pending_count(records);
    format!("{settled}/{} jobs settled", records.len())
}

fn push_detail(
    line: &mut String,
    terminal: bool,
    progress: Option<f32>,
    output: &[String],
    failure: Option<&str>,
) {
    if let (false, Some(progress)) = (terminal, progress) {
        line.push_str(&format!(" {:.0}%", progress * 100.0));
    }
    for url in output {
        line.push_str(&format!(" {url}"));
    }
    if let Some(failure) = failure {
        line.push_str(&format!(" ({failure})"));
    }
}
