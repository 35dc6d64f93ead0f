// Test fixtures - reusable test data
// Provides consistent records and grids across all test files

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use month_grid::models::event::{EventRecord, EventSource};
use month_grid::models::grid::MonthGrid;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Day `d` of March 2025, the month most fixtures lay out
    pub fn march(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    pub fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }
}

/// Sample event records for testing
pub mod events {
    use super::*;

    /// Untimed user event covering March `start..=end`
    pub fn span(id: &str, start: u32, end: u32) -> EventRecord {
        EventRecord::builder()
            .id(id)
            .name(id)
            .start(dates::march(start))
            .end(dates::march(end))
            .build()
            .unwrap()
    }

    pub fn all_day(id: &str, day: u32) -> EventRecord {
        EventRecord::builder()
            .id(id)
            .name(id)
            .start(dates::march(day))
            .all_day(true)
            .build()
            .unwrap()
    }

    pub fn timed(id: &str, day: u32, hour: u32) -> EventRecord {
        EventRecord::builder()
            .id(id)
            .name(id)
            .start(dates::march(day))
            .time(dates::time(hour, 0), dates::time(hour + 1, 0))
            .build()
            .unwrap()
    }

    /// Timed user event over March `start..=end`, one hour from `hour`
    pub fn timed_span(id: &str, start: u32, end: u32, hour: u32) -> EventRecord {
        EventRecord::builder()
            .id(id)
            .name(id)
            .start(dates::march(start))
            .end(dates::march(end))
            .time(dates::time(hour, 0), dates::time(hour + 1, 0))
            .build()
            .unwrap()
    }

    pub fn holiday(name: &str, day: u32) -> EventRecord {
        EventRecord::builder()
            .id(name)
            .name(name)
            .category("holidays")
            .start(dates::march(day))
            .all_day(true)
            .source(EventSource::Holiday)
            .build()
            .unwrap()
    }

    pub fn in_category(mut record: EventRecord, category_id: &str) -> EventRecord {
        record.category_id = category_id.to_string();
        record
    }
}

/// March 2025 grid with every record shown.
pub fn march_grid(records: &[EventRecord]) -> MonthGrid {
    let mut grid = MonthGrid::new(2025, 3).unwrap();
    for record in records {
        grid.add_record(record, true);
    }
    grid
}
