use super::shared::{deserialize_span, parse_time_pair};
use super::EventService;
use crate::models::event::{EventRecord, EventSource};
use crate::utils::date::DateRange;
use anyhow::Result;
use rusqlite::{self, params_from_iter, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "SELECT id, name, category_id, dates, start_time, end_time,
        is_all_day, location, notes
     FROM events";

impl<'a> EventService<'a> {
    /// Retrieve an event by ID.
    pub fn get(&self, id: &str) -> Result<Option<EventRecord>> {
        let event = self
            .conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), [id], map_event_row)
            .optional()?;
        Ok(event)
    }

    /// List every event ordered by start date.
    pub fn list_all(&self) -> Result<Vec<EventRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY start_date ASC, id ASC", SELECT_COLUMNS))?;

        let events = stmt
            .query_map([], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Events whose start year is one of `years`.
    pub fn list_for_years(&self, years: &[i32]) -> Result<Vec<EventRecord>> {
        if years.is_empty() {
            return Ok(vec![]);
        }

        let placeholders = vec!["?"; years.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE start_year IN ({}) ORDER BY start_date ASC, id ASC",
            SELECT_COLUMNS, placeholders
        ))?;

        let events = stmt
            .query_map(params_from_iter(years.iter()), map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Events covering at least one date of `range`.
    pub fn find_by_date_range(&self, range: &DateRange) -> Result<Vec<EventRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE start_date <= ?1 AND end_date >= ?2 ORDER BY start_date ASC, id ASC",
            SELECT_COLUMNS
        ))?;

        let events = stmt
            .query_map(
                [range.end.to_string(), range.start.to_string()],
                map_event_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events
            .into_iter()
            .filter(|event| range.intersects(event.dates()))
            .collect())
    }

    /// Search events by name, location or notes.
    pub fn search(&self, query: &str) -> Result<Vec<EventRecord>> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }

        let search_pattern = format!("%{}%", query.trim().to_lowercase());
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE LOWER(name) LIKE ?1
                OR LOWER(COALESCE(location, '')) LIKE ?1
                OR LOWER(COALESCE(notes, '')) LIKE ?1
             ORDER BY start_date ASC, id ASC",
            SELECT_COLUMNS
        ))?;

        let events = stmt
            .query_map([&search_pattern], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }
}

fn map_event_row(row: &Row<'_>) -> Result<EventRecord, rusqlite::Error> {
    Ok(EventRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        category_id: row.get(2)?,
        span: deserialize_span(row.get(3)?)?,
        time: parse_time_pair(row.get(4)?, row.get(5)?)?,
        all_day: row.get::<_, i32>(6)? != 0,
        source: EventSource::User,
        location: row.get(7)?,
        notes: row.get(8)?,
    })
}
