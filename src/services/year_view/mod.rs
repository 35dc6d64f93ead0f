//! Twelve small month grids for one year, plus the event list of a chosen
//! date.
//!
//! The year view carries no stacking rows. A day only shows whether it has
//! visible events; the events themselves are listed per date in the same
//! priority order the month layout stacks them.

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::category::CategoryVisibility;
use crate::models::event::{EventRecord, EventSource};
use crate::models::grid::MonthGrid;
use crate::services::category::VisibilityMap;
use crate::services::event::EventService;
use crate::services::holiday::HolidayService;
use crate::services::layout::SortKey;

mod render;

pub use render::{render_day, render_year};

/// Label shown instead of a start time for all-day and multi-day events.
pub const ALL_DAY_LABEL: &str = "all-day";

/// One line of a date's event list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub event_id: String,
    pub name: String,
    pub category_id: String,
    pub source: EventSource,
    /// Start time as `HH:MM`, or [`ALL_DAY_LABEL`]
    pub time_label: String,
}

pub struct YearView {
    year: i32,
    months: Vec<MonthGrid>,
    records: Vec<EventRecord>,
    visibility: VisibilityMap,
}

impl YearView {
    /// Load `year` with the user events and holidays of the years its grids
    /// touch. Pass no holiday service to leave the feed out.
    pub fn load(
        year: i32,
        events: &EventService<'_>,
        holidays: Option<(&mut HolidayService, &str)>,
        visibility: VisibilityMap,
    ) -> Result<Self> {
        let years = [year - 1, year, year + 1];
        let mut records = events.list_for_years(&years)?;

        if let Some((service, country)) = holidays {
            for y in years {
                records.extend(service.records(country, y));
            }
        }

        log::debug!("Year {} loaded with {} records", year, records.len());
        Self::from_records(year, records, visibility)
    }

    pub fn from_records(year: i32, records: Vec<EventRecord>, visibility: VisibilityMap) -> Result<Self> {
        let months = (1..=12)
            .map(|month| MonthGrid::build(year, month, &records, &visibility))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            year,
            months,
            records,
            visibility,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn months(&self) -> &[MonthGrid] {
        &self.months
    }

    /// Grid of `month` (1 to 12).
    pub fn month(&self, month: u32) -> Option<&MonthGrid> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index)
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Whether any of the twelve grids shows `date`, leading and trailing
    /// days of neighbouring months included.
    pub fn shows(&self, date: NaiveDate) -> bool {
        self.months.iter().any(|grid| grid.cell(date).is_some())
    }

    /// Visible events covering `date`, in stacking priority. `None` when no
    /// grid of this year shows the date.
    pub fn events_on(&self, date: NaiveDate) -> Option<Vec<DayEntry>> {
        if !self.shows(date) {
            return None;
        }

        let mut matching: Vec<&EventRecord> = self
            .records
            .iter()
            .filter(|r| r.span.contains(date))
            .filter(|r| self.visibility.is_visible(&r.category_id))
            .collect();
        matching.sort_by(|a, b| {
            SortKey::for_record(a, a.dates().len())
                .priority_cmp(&SortKey::for_record(b, b.dates().len()))
        });

        Some(matching.into_iter().map(day_entry).collect())
    }
}

fn day_entry(record: &EventRecord) -> DayEntry {
    let time_label = match record.start_time() {
        Some(start) if !record.all_day && !record.span.is_multi_day() => {
            start.format("%H:%M").to_string()
        }
        _ => ALL_DAY_LABEL.to_string(),
    };

    DayEntry {
        event_id: record.id.clone(),
        name: record.name.clone(),
        category_id: record.category_id.clone(),
        source: record.source,
        time_label,
    }
}
