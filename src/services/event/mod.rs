//! Calendar event service entry point.
//! Provides database-backed operations for user events, organized across
//! focused submodules.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::event::EventRecord;
use crate::utils::date::DateRange;

pub mod crud;
pub mod queries;
mod shared;

/// Source of the event records shown for a date range.
pub trait EventStore {
    fn visible_events(&self, range: &DateRange) -> Result<Vec<EventRecord>>;
}

/// Service for managing calendar events stored in SQLite.
pub struct EventService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> EventService<'a> {
    /// Create a new EventService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl EventStore for EventService<'_> {
    /// Reads the year buckets the range touches, then keeps the records
    /// covering at least one date of it.
    fn visible_events(&self, range: &DateRange) -> Result<Vec<EventRecord>> {
        // A record starting in December can cover January of the next year
        let mut years = range.years();
        if let Some(first) = years.first().copied() {
            years.insert(0, first - 1);
        }

        let events = self
            .list_for_years(&years)?
            .into_iter()
            .filter(|event| range.intersects(event.dates()))
            .collect();
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventSpan;
    use crate::services::database::Database;
    use chrono::{NaiveDate, NaiveTime};

    fn setup_test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_event() -> EventRecord {
        EventRecord::new("Test Event", date(2025, 3, 10)).unwrap()
    }

    #[test]
    fn test_create_event_assigns_id() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let created = service.create(sample_event()).unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.name, "Test Event");
    }

    #[test]
    fn test_create_event_keeps_given_id() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.id = "fixed".to_string();
        let created = service.create(event).unwrap();

        assert_eq!(created.id, "fixed");
        assert!(service.get("fixed").unwrap().is_some());
    }

    #[test]
    fn test_create_event_with_optional_fields() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let event = EventRecord::builder()
            .name("Conference")
            .location("Convention Center")
            .notes("Annual tech conference")
            .start(date(2025, 5, 6))
            .end(date(2025, 5, 8))
            .time(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            )
            .category("work")
            .build()
            .unwrap();

        let created = service.create(event.clone()).unwrap();
        let stored = service.get(&created.id).unwrap().unwrap();

        assert_eq!(stored.span, event.span);
        assert_eq!(stored.time, event.time);
        assert_eq!(stored.location, event.location);
        assert_eq!(stored.notes, event.notes);
        assert_eq!(stored.category_id, "work");
        assert!(stored.span.is_multi_day());
    }

    #[test]
    fn test_create_rejects_holiday_records() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.source = crate::models::event::EventSource::Holiday;

        assert!(service.create(event).is_err());
    }

    #[test]
    fn test_get_nonexistent_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let result = service.get("missing");
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_update_event_moves_year_bucket() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = service.create(sample_event()).unwrap();
        event.name = "Updated Title".to_string();
        event.span = EventSpan::SingleDay(date(2026, 1, 2));

        service.update(&event).unwrap();

        assert!(service.list_for_years(&[2025]).unwrap().is_empty());
        let moved = service.list_for_years(&[2026]).unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].name, "Updated Title");
    }

    #[test]
    fn test_update_nonexistent_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.id = "missing".to_string();

        assert!(service.update(&event).is_err());
    }

    #[test]
    fn test_delete_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let created = service.create(sample_event()).unwrap();

        service.delete(&created.id).unwrap();

        assert!(service.get(&created.id).unwrap().is_none());
        assert!(service.delete(&created.id).is_err());
    }

    #[test]
    fn test_list_all_events() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        service.create(sample_event()).unwrap();
        service.create(sample_event()).unwrap();
        service.create(sample_event()).unwrap();

        assert_eq!(service.list_all().unwrap().len(), 3);
    }

    #[test]
    fn test_find_by_date_range() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        service
            .create(EventRecord::new("Past Event", date(2025, 3, 1)).unwrap())
            .unwrap();
        service
            .create(
                EventRecord::builder()
                    .name("Spanning Event")
                    .start(date(2025, 3, 8))
                    .end(date(2025, 3, 12))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        service
            .create(EventRecord::new("Future Event", date(2025, 3, 20)).unwrap())
            .unwrap();

        let range = DateRange::new(date(2025, 3, 10), date(2025, 3, 15));
        let events = service.find_by_date_range(&range).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Spanning Event");
    }

    #[test]
    fn test_search_matches_name_and_notes() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        service
            .create(EventRecord::new("Team Lunch", date(2025, 3, 3)).unwrap())
            .unwrap();
        service
            .create(
                EventRecord::builder()
                    .name("Errands")
                    .notes("pick up LUNCH boxes")
                    .start(date(2025, 3, 4))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        service
            .create(EventRecord::new("Gym", date(2025, 3, 5)).unwrap())
            .unwrap();

        assert_eq!(service.search("lunch").unwrap().len(), 2);
        assert!(service.search("   ").unwrap().is_empty());
    }

    #[test]
    fn test_visible_events_include_previous_year_spill() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        service
            .create(
                EventRecord::builder()
                    .name("New Year Trip")
                    .start(date(2024, 12, 30))
                    .end(date(2025, 1, 2))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        service
            .create(EventRecord::new("Later", date(2025, 2, 20)).unwrap())
            .unwrap();

        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31));
        let events = service.visible_events(&range).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "New Year Trip");
    }

    #[test]
    fn test_reassign_category() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.category_id = "work".to_string();
        let created = service.create(event).unwrap();

        assert_eq!(service.reassign_category("work", "default").unwrap(), 1);
        assert_eq!(
            service.get(&created.id).unwrap().unwrap().category_id,
            "default"
        );
    }
}
