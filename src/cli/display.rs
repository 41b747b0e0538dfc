//! Table and status rendering for CLI output.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use console::style;

use crate::domain::models::{GeneratedTest, LadderLevel, PlacementSession, SectionOutcome};
use crate::services::ladder;

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

fn option_text<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Render a session as a key/value table.
pub fn session_table(session: &PlacementSession) -> Table {
    let mut table = list_table(&["Field", "Value"]);
    table.add_row(vec!["Session".to_string(), session.id.to_string()]);
    table.add_row(vec!["User".to_string(), session.user_id.to_string()]);
    table.add_row(vec!["Status".to_string(), session.status.to_string()]);
    table.add_row(vec![
        "Current level".to_string(),
        session.current_level.to_string(),
    ]);
    table.add_row(vec![
        "Score".to_string(),
        session
            .score_percentage
            .map_or_else(|| "-".to_string(), |s| format!("{s:.1}%")),
    ]);
    table.add_row(vec![
        "Next action".to_string(),
        session
            .next_action
            .map_or_else(|| "-".to_string(), |a| format!("{a:?}")),
    ]);
    table.add_row(vec![
        "Determined level".to_string(),
        option_text(session.determined_level),
    ]);
    table.add_row(vec![
        "Completed at".to_string(),
        option_text(session.completed_at),
    ]);
    table
}

/// Render the ladder transition table.
pub fn ladder_table() -> Table {
    let mut table = list_table(&["Level", "Passed", "Next step"]);
    for level in LadderLevel::ALL {
        for passed in [true, false] {
            let action = ladder::next_action(level, passed);
            table.add_row(vec![
                level.to_string(),
                if passed { "yes" } else { "no" }.to_string(),
                format!("{action:?}"),
            ]);
        }
    }
    table
}

/// Render a one-line summary per section of a generated test.
pub fn test_summary(test: &GeneratedTest) -> String {
    let mut lines = Vec::new();
    for (kind, outcome) in test.sections() {
        let line = match outcome {
            SectionOutcome::Ready(data) => format!(
                "  {} {} ({} items)",
                style("ok").green(),
                kind,
                data.items.len()
            ),
            SectionOutcome::Failed { reason } => {
                format!("  {} {} ({reason})", style("failed").red(), kind)
            }
        };
        lines.push(line);
    }
    lines.join("\n")
}
