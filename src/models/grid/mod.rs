//! Month grid model.
//!
//! A `MonthGrid` is the rendered month: 42 day cells in reading order, each
//! holding one fragment per event shown on that date. The layout engine
//! writes `EventFragment::row` and `DayCell::row_capacity`; nothing else in
//! the grid is layout state.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::models::category::CategoryVisibility;
use crate::models::event::EventRecord;
use crate::utils::date::{self, DateRange, GRID_CELLS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

/// One event's presence on one day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFragment {
    pub event_id: String,
    pub category_id: String,
    /// Set when the event's category is toggled off
    pub hidden: bool,
    /// Zero-based stacking row, assigned by the layout pass
    pub row: Option<usize>,
}

impl EventFragment {
    pub fn new(event_id: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            category_id: category_id.into(),
            hidden: false,
            row: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

/// One date slot of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Week row of the grid, 1..=6
    pub week_row: u8,
    /// Monday = 1 ... Sunday = 7
    pub weekday: u8,
    pub fragments: Vec<EventFragment>,
    /// Number of stacking rows the cell renders
    pub row_capacity: usize,
}

impl DayCell {
    pub fn visible_fragments(&self) -> impl Iterator<Item = &EventFragment> {
        self.fragments.iter().filter(|f| f.is_visible())
    }

    pub fn visible_count(&self) -> usize {
        self.visible_fragments().count()
    }

    pub fn has_visible_fragments(&self) -> bool {
        self.fragments.iter().any(EventFragment::is_visible)
    }

    pub fn fragment(&self, event_id: &str) -> Option<&EventFragment> {
        self.fragments.iter().find(|f| f.event_id == event_id)
    }

    /// Deepest assigned row plus one, or zero when nothing is placed.
    pub fn occupied_depth(&self) -> usize {
        self.visible_fragments()
            .filter_map(|f| f.row)
            .map(|row| row + 1)
            .max()
            .unwrap_or(0)
    }
}

/// The 42 day cells of one rendered month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Create the grid for `year`/`month` with no events.
    pub fn new(year: i32, month: u32) -> Result<Self, GridError> {
        let dates = date::month_grid_dates(year, month)
            .ok_or(GridError::InvalidMonth { year, month })?;

        let cells = dates
            .into_iter()
            .enumerate()
            .map(|(index, date)| DayCell {
                date,
                week_row: (index / 7 + 1) as u8,
                weekday: date::weekday_index(date),
                fragments: Vec::new(),
                row_capacity: 0,
            })
            .collect();

        Ok(Self { year, month, cells })
    }

    /// Create the grid and place a fragment for every date of every record
    /// that falls inside it. Fragments of invisible categories start hidden.
    pub fn build(
        year: i32,
        month: u32,
        records: &[EventRecord],
        visibility: &dyn CategoryVisibility,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(year, month)?;
        for record in records {
            grid.add_record(record, visibility.is_visible(&record.category_id));
        }
        Ok(grid)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [DayCell] {
        &mut self.cells
    }

    /// Cells grouped by week row, top to bottom.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn cell_index(&self, date: NaiveDate) -> Option<usize> {
        let first = self.cells.first()?.date;
        let offset = date.signed_duration_since(first).num_days();
        (0..GRID_CELLS as i64)
            .contains(&offset)
            .then_some(offset as usize)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cell_index(date).map(|i| &self.cells[i])
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.cells[0].date, self.cells[GRID_CELLS - 1].date)
    }

    pub fn years(&self) -> Vec<i32> {
        self.date_range().years()
    }

    /// Whether `date` belongs to the month being shown rather than a
    /// leading/trailing neighbour.
    pub fn is_current_month(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Append a fragment for each date of `record` shown in the grid.
    /// Returns the number of fragments placed.
    pub fn add_record(&mut self, record: &EventRecord, visible: bool) -> usize {
        let mut placed = 0;
        for date in record.dates() {
            let Some(index) = self.cell_index(*date) else {
                continue;
            };
            let cell = &mut self.cells[index];
            if cell.fragment(&record.id).is_some() {
                log::warn!("Event '{}' already shown on {}, skipping", record.id, date);
                continue;
            }
            let mut fragment = EventFragment::new(record.id.clone(), record.category_id.clone());
            fragment.hidden = !visible;
            cell.fragments.push(fragment);
            placed += 1;
        }
        placed
    }

    /// Remove every fragment of `event_id`. Returns the number removed.
    pub fn remove_event(&mut self, event_id: &str) -> usize {
        let mut removed = 0;
        for cell in &mut self.cells {
            let before = cell.fragments.len();
            cell.fragments.retain(|f| f.event_id != event_id);
            removed += before - cell.fragments.len();
        }
        removed
    }

    /// Replace an event's fragments after its dates or category changed.
    pub fn replace_record(&mut self, record: &EventRecord, visible: bool) {
        self.remove_event(&record.id);
        self.add_record(record, visible);
    }

    /// Refresh every fragment's hidden flag from the category visibility.
    pub fn apply_visibility(&mut self, visibility: &dyn CategoryVisibility) {
        for fragment in self.cells.iter_mut().flat_map(|c| c.fragments.iter_mut()) {
            fragment.hidden = !visibility.is_visible(&fragment.category_id);
        }
    }

    /// Rows assigned to `event_id`, in cell order.
    pub fn rows_of(&self, event_id: &str) -> Vec<(NaiveDate, Option<usize>)> {
        self.cells
            .iter()
            .filter_map(|cell| cell.fragment(event_id).map(|f| (cell.date, f.row)))
            .collect()
    }
}
