//! Plain-text rendering of a year and of one date's event list.

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};

use super::{DayEntry, YearView};
use crate::models::event::EventSource;
use crate::models::grid::MonthGrid;

const DAY_NAMES: &str = "Mo Tu We Th Fr Sa Su";

/// Draw the twelve months one under another. Days of the month carry a `*`
/// when they have visible events; neighbouring-month days are left blank.
pub fn render_year(view: &YearView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.year());
    for grid in view.months() {
        out.push('\n');
        render_small_month(&mut out, grid);
    }
    out
}

fn render_small_month(out: &mut String, grid: &MonthGrid) {
    let title = NaiveDate::from_ymd_opt(grid.year(), grid.month(), 1)
        .map(|d| d.format("%B").to_string())
        .unwrap_or_default();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", DAY_NAMES);

    for week in grid.weeks() {
        let mut line = String::new();
        for cell in week {
            if !grid.is_current_month(cell.date) {
                line.push_str("   ");
            } else {
                let marker = if cell.has_visible_fragments() { '*' } else { ' ' };
                let _ = write!(line, "{:>2}{}", cell.date.day(), marker);
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

/// Event list of `date`, one entry per line.
pub fn render_day(date: NaiveDate, entries: &[DayEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", date.format("%A %-d %B %Y"));
    if entries.is_empty() {
        let _ = writeln!(out, "  No events");
    }
    for entry in entries {
        let marker = match entry.source {
            EventSource::User => "",
            EventSource::Holiday => " (holiday)",
        };
        let _ = writeln!(out, "  {:<8} {}{}", entry.time_label, entry.name, marker);
    }
    out
}
