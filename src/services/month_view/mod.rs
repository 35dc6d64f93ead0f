//! One displayed month: its grid, the records behind it and the layout queue.
//!
//! Every change to what the month shows goes through one of the event
//! methods below, which update the grid and raise the matching layout
//! trigger.

use std::time::Instant;

use anyhow::{anyhow, Result};

use crate::models::category::CategoryVisibility;
use crate::models::event::EventRecord;
use crate::models::grid::MonthGrid;
use crate::models::ui::{ClickOutcome, ClickTracker};
use crate::services::category::VisibilityMap;
use crate::services::event::EventStore;
use crate::services::layout::{LayoutQueue, LayoutReport, LayoutTrigger, PassObserver};

mod render;

pub use render::{overflow_count, render_month, CELL_WIDTH};

pub struct MonthView {
    grid: MonthGrid,
    records: Vec<EventRecord>,
    visibility: VisibilityMap,
    queue: LayoutQueue,
    clicks: ClickTracker,
    last_report: Option<LayoutReport>,
}

impl MonthView {
    /// Build the month from `store` plus any feed records and lay it out.
    pub fn load(
        year: i32,
        month: u32,
        store: &dyn EventStore,
        feed_records: Vec<EventRecord>,
        visibility: VisibilityMap,
    ) -> Result<Self> {
        let range = MonthGrid::new(year, month)?.date_range();
        let mut records = store.visible_events(&range)?;
        records.extend(feed_records);
        Self::from_records(year, month, records, visibility)
    }

    pub fn from_records(
        year: i32,
        month: u32,
        records: Vec<EventRecord>,
        visibility: VisibilityMap,
    ) -> Result<Self> {
        let grid = MonthGrid::build(year, month, &records, &visibility)?;
        let mut view = Self {
            grid,
            records,
            visibility,
            queue: LayoutQueue::new(),
            clicks: ClickTracker::default(),
            last_report: None,
        };
        view.run(LayoutTrigger::MonthChanged, &mut ());
        Ok(view)
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&EventRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn last_report(&self) -> Option<&LayoutReport> {
        self.last_report.as_ref()
    }

    /// Show a newly created event; it takes the top row for this pass.
    pub fn event_created(&mut self, record: EventRecord) {
        if self.record(&record.id).is_some() {
            log::warn!("Event '{}' is already shown, replacing it", record.id);
            self.records.retain(|r| r.id != record.id);
        }
        let visible = self.visibility.is_visible(&record.category_id);
        self.grid.replace_record(&record, visible);
        let trigger = LayoutTrigger::EventCreated(record.id.clone());
        self.records.push(record);
        self.run(trigger, &mut ());
    }

    /// Apply an edit to a shown event.
    pub fn event_changed(&mut self, record: EventRecord) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == record.id)
            .ok_or_else(|| anyhow!("Event with id {} is not shown", record.id))?;

        let previous = &self.records[index];
        let trigger = if previous.span != record.span {
            LayoutTrigger::DatesChanged(record.id.clone())
        } else if previous.all_day != record.all_day {
            LayoutTrigger::AllDayToggled(record.id.clone())
        } else {
            LayoutTrigger::Refresh
        };

        let visible = self.visibility.is_visible(&record.category_id);
        self.grid.replace_record(&record, visible);
        self.records[index] = record;
        self.run(trigger, &mut ());
        Ok(())
    }

    pub fn event_deleted(&mut self, id: &str) {
        self.records.retain(|r| r.id != id);
        if self.grid.remove_event(id) == 0 {
            log::debug!("Deleted event '{}' was not shown in this month", id);
        }
        self.run(LayoutTrigger::EventDeleted(id.to_string()), &mut ());
    }

    pub fn category_toggled(&mut self, category_id: &str, visible: bool) {
        self.visibility.set(category_id, visible);
        self.grid.apply_visibility(&self.visibility);
        self.run(LayoutTrigger::CategoryToggled(category_id.to_string()), &mut ());
    }

    /// Lay the month out again in its natural order.
    pub fn refresh(&mut self) {
        self.run(LayoutTrigger::Refresh, &mut ());
    }

    /// An event's details panel was opened.
    pub fn details_opened(&mut self) {
        self.clicks.open();
    }

    /// A click anywhere while details may be open. A resolved single click
    /// closes the panel and drops any priority placement.
    pub fn click(&mut self, now: Instant) -> ClickOutcome {
        let outcome = self.clicks.click(now);
        self.apply_click(outcome);
        outcome
    }

    /// Resolve a pending click once its double-click window has passed.
    pub fn poll_clicks(&mut self, now: Instant) -> Option<ClickOutcome> {
        let outcome = self.clicks.poll(now)?;
        self.apply_click(outcome);
        Some(outcome)
    }

    fn apply_click(&mut self, outcome: ClickOutcome) {
        if outcome == ClickOutcome::SingleClick {
            self.refresh();
        }
    }

    /// Run `trigger` and everything `observer` queues in response.
    pub fn run(&mut self, trigger: LayoutTrigger, observer: &mut dyn PassObserver) {
        let passes = self
            .queue
            .trigger(trigger, &mut self.grid, &self.records, observer);
        if let Some((_, report)) = passes.into_iter().last() {
            self.last_report = Some(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventSource;
    use crate::models::grid::GridError;
    use crate::utils::date::DateRange;
    use chrono::NaiveDate;

    struct StaticStore(Vec<EventRecord>);

    impl EventStore for StaticStore {
        fn visible_events(&self, range: &DateRange) -> Result<Vec<EventRecord>> {
            Ok(self
                .0
                .iter()
                .filter(|r| range.intersects(r.dates()))
                .cloned()
                .collect())
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn event(id: &str, start: u32, end: u32) -> EventRecord {
        EventRecord::builder()
            .id(id)
            .name(id)
            .start(date(start))
            .end(date(end))
            .build()
            .unwrap()
    }

    #[test]
    fn test_load_merges_store_and_feed() {
        let store = StaticStore(vec![event("mine", 10, 10), event("april", 1, 1)]);
        let holiday = EventRecord::builder()
            .id("Spring Day")
            .name("Spring Day")
            .start(date(10))
            .all_day(true)
            .source(EventSource::Holiday)
            .build()
            .unwrap();

        let view = MonthView::load(2025, 3, &store, vec![holiday], VisibilityMap::new()).unwrap();

        assert_eq!(view.records().len(), 3);
        // All-day holiday stacks above the untimed user event
        assert_eq!(view.grid().rows_of("Spring Day"), vec![(date(10), Some(0))]);
        assert_eq!(view.grid().rows_of("mine"), vec![(date(10), Some(1))]);
    }

    #[test]
    fn test_load_rejects_invalid_month() {
        let err = MonthView::load(2025, 13, &StaticStore(Vec::new()), Vec::new(), VisibilityMap::new())
            .err()
            .unwrap();

        assert_eq!(
            err.downcast_ref::<GridError>(),
            Some(&GridError::InvalidMonth { year: 2025, month: 13 })
        );
    }

    #[test]
    fn test_created_event_is_on_top_until_refresh() {
        let mut view = MonthView::from_records(
            2025,
            3,
            vec![event("long", 9, 12)],
            VisibilityMap::new(),
        )
        .unwrap();

        view.event_created(event("new", 10, 10));
        assert_eq!(view.grid().rows_of("new"), vec![(date(10), Some(0))]);
        assert_eq!(view.grid().rows_of("long")[0].1, Some(1));

        view.refresh();
        assert_eq!(view.grid().rows_of("new"), vec![(date(10), Some(1))]);
        assert_eq!(view.grid().rows_of("long")[0].1, Some(0));
    }

    #[test]
    fn test_single_click_after_create_restores_natural_order() {
        let mut view = MonthView::from_records(
            2025,
            3,
            vec![event("long", 9, 12)],
            VisibilityMap::new(),
        )
        .unwrap();
        view.event_created(event("new", 10, 10));
        view.details_opened();
        let start = Instant::now();

        assert_eq!(view.click(start), ClickOutcome::Pending);
        assert_eq!(view.grid().rows_of("new"), vec![(date(10), Some(0))]);

        let outcome = view.poll_clicks(start + crate::models::ui::DOUBLE_CLICK_DELAY);
        assert_eq!(outcome, Some(ClickOutcome::SingleClick));
        assert_eq!(view.grid().rows_of("new"), vec![(date(10), Some(1))]);
    }

    #[test]
    fn test_double_click_keeps_layout() {
        let mut view = MonthView::from_records(
            2025,
            3,
            vec![event("long", 9, 12)],
            VisibilityMap::new(),
        )
        .unwrap();
        view.event_created(event("new", 10, 10));
        view.details_opened();
        let start = Instant::now();

        view.click(start);
        assert_eq!(
            view.click(start + std::time::Duration::from_millis(50)),
            ClickOutcome::DoubleClick
        );
        assert_eq!(view.grid().rows_of("new"), vec![(date(10), Some(0))]);
    }

    #[test]
    fn test_changed_dates_move_fragments() {
        let mut view =
            MonthView::from_records(2025, 3, vec![event("trip", 3, 4)], VisibilityMap::new())
                .unwrap();

        view.event_changed(event("trip", 17, 19)).unwrap();

        let dates: Vec<_> = view.grid().rows_of("trip").into_iter().map(|(d, _)| d).collect();
        assert_eq!(dates, vec![date(17), date(18), date(19)]);
        assert!(view.event_changed(event("ghost", 1, 1)).is_err());
    }

    #[test]
    fn test_hidden_category_frees_rows() {
        let mut work = event("work", 5, 5);
        work.category_id = "work".to_string();
        let mut view = MonthView::from_records(
            2025,
            3,
            vec![work, event("home", 5, 5)],
            VisibilityMap::new(),
        )
        .unwrap();
        assert_eq!(view.grid().rows_of("home"), vec![(date(5), Some(1))]);

        view.category_toggled("work", false);

        assert_eq!(view.grid().rows_of("home"), vec![(date(5), Some(0))]);
        assert_eq!(view.grid().rows_of("work"), vec![(date(5), None)]);
        assert_eq!(view.last_report().unwrap().max_depth, 1);
    }

    #[test]
    fn test_deleted_event_leaves_grid() {
        let mut view =
            MonthView::from_records(2025, 3, vec![event("a", 5, 6)], VisibilityMap::new()).unwrap();

        view.event_deleted("a");

        assert!(view.records().is_empty());
        assert!(view.grid().rows_of("a").is_empty());
        assert_eq!(view.last_report().unwrap().placed_fragments, 0);
    }
}
