//! Plain-text rendering of a laid-out month.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::Datelike;

use crate::models::event::EventRecord;
use crate::models::grid::{DayCell, MonthGrid};

/// Characters per day column, separator included.
pub const CELL_WIDTH: usize = 14;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Visible fragments of `cell` placed at or past `max_rows`.
pub fn overflow_count(cell: &DayCell, max_rows: Option<usize>) -> usize {
    let Some(limit) = max_rows else {
        return 0;
    };
    cell.visible_fragments()
        .filter(|f| f.row.map_or(false, |row| row >= limit))
        .count()
}

/// Draw the month as week rows of stacked event names.
///
/// Each week shows as many rows as its row capacity, cut to `max_rows` when
/// set, followed by a "+N more" line for the cells that lost rows to the cut.
pub fn render_month(grid: &MonthGrid, records: &[EventRecord], max_rows: Option<usize>) -> String {
    let names: HashMap<&str, &str> = records
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str()))
        .collect();

    let mut out = String::new();
    let title = chrono::NaiveDate::from_ymd_opt(grid.year(), grid.month(), 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();
    let _ = writeln!(out, "{}", title);
    for name in DAY_NAMES {
        let _ = write!(out, "{:<width$}", name, width = CELL_WIDTH);
    }
    out.push('\n');

    for week in grid.weeks() {
        for cell in week {
            let label = if grid.is_current_month(cell.date) {
                format!("{:>2}", cell.date.day())
            } else {
                format!("({})", cell.date.day())
            };
            let _ = write!(out, "{:<width$}", label, width = CELL_WIDTH);
        }
        out.push('\n');

        let capacity = week.first().map_or(0, |c| c.row_capacity);
        let shown = max_rows.map_or(capacity, |limit| capacity.min(limit));
        for row in 0..shown {
            for cell in week {
                let text = cell
                    .visible_fragments()
                    .find(|f| f.row == Some(row))
                    .map(|f| names.get(f.event_id.as_str()).copied().unwrap_or(f.event_id.as_str()))
                    .unwrap_or("");
                let _ = write!(
                    out,
                    "{:<width$}",
                    truncate(text, CELL_WIDTH - 1),
                    width = CELL_WIDTH
                );
            }
            out.push('\n');
        }

        if week.iter().any(|c| overflow_count(c, max_rows) > 0) {
            for cell in week {
                let hidden = overflow_count(cell, max_rows);
                let text = if hidden > 0 {
                    format!("+{} more", hidden)
                } else {
                    String::new()
                };
                let _ = write!(out, "{:<width$}", text, width = CELL_WIDTH);
            }
            out.push('\n');
        }
    }

    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
