use super::shared::{format_time, serialize_dates};
use super::EventService;
use crate::models::event::{EventRecord, EventSource};
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use rusqlite::params;

impl<'a> EventService<'a> {
    /// Store a new user event. An empty id is replaced by a fresh UUID.
    pub fn create(&self, mut event: EventRecord) -> Result<EventRecord> {
        event.validate()?;
        if event.source != EventSource::User {
            return Err(anyhow!("Only user events can be stored"));
        }
        if event.id.trim().is_empty() {
            event.id = uuid::Uuid::new_v4().to_string();
        }

        let now = Local::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO events (
                    id, start_year, name, category_id, start_date, end_date, dates,
                    start_time, end_time, is_all_day, location, notes, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
                params![
                    event.id,
                    event.start_year(),
                    event.name,
                    event.category_id,
                    event.span.start().to_string(),
                    event.span.end().to_string(),
                    serialize_dates(&event.span),
                    event.time.map(|t| format_time(t.start)),
                    event.time.map(|t| format_time(t.end)),
                    event.all_day as i32,
                    event.location,
                    event.notes,
                    now,
                ],
            )
            .context("Failed to insert event")?;

        log::info!("Created event '{}' in year {}", event.id, event.start_year());
        Ok(event)
    }

    /// Rewrite an existing event. A changed start date moves it to its new
    /// year bucket.
    pub fn update(&self, event: &EventRecord) -> Result<()> {
        event.validate()?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE events SET
                    start_year = ?1, name = ?2, category_id = ?3, start_date = ?4, end_date = ?5,
                    dates = ?6, start_time = ?7, end_time = ?8, is_all_day = ?9,
                    location = ?10, notes = ?11, updated_at = ?12
                 WHERE id = ?13",
                params![
                    event.start_year(),
                    event.name,
                    event.category_id,
                    event.span.start().to_string(),
                    event.span.end().to_string(),
                    serialize_dates(&event.span),
                    event.time.map(|t| format_time(t.start)),
                    event.time.map(|t| format_time(t.end)),
                    event.all_day as i32,
                    event.location,
                    event.notes,
                    Local::now().to_rfc3339(),
                    event.id,
                ],
            )
            .context("Failed to update event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", event.id));
        }

        Ok(())
    }

    /// Delete an event by ID.
    pub fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1", [id])
            .context("Failed to delete event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        log::info!("Deleted event '{}'", id);
        Ok(())
    }

    /// Move every event of one category to another.
    pub fn reassign_category(&self, from: &str, to: &str) -> Result<usize> {
        let moved = self
            .conn
            .execute(
                "UPDATE events SET category_id = ?1, updated_at = ?2 WHERE category_id = ?3",
                params![to, Local::now().to_rfc3339(), from],
            )
            .context("Failed to reassign event category")?;
        Ok(moved)
    }
}
