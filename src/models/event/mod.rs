// Event module
// Calendar event record shared by the event store, the holiday feed and the month grid

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Category id given to events created without one.
pub const DEFAULT_CATEGORY_ID: &str = "default";

/// Where an event record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Created by the user and persisted in the event store
    User,
    /// Supplied by the external holiday feed
    Holiday,
}

/// The calendar dates an event covers.
///
/// Decided once when the record is built; a record spanning one date is
/// always `SingleDay`, never a one-element `MultiDay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "dates", rename_all = "snake_case")]
pub enum EventSpan {
    SingleDay(NaiveDate),
    MultiDay(Vec<NaiveDate>),
}

impl EventSpan {
    /// Build the span covering every date from `start` to `end` inclusive.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, EventValidationError> {
        if end < start {
            return Err(EventValidationError::EndBeforeStart);
        }
        if end == start {
            return Ok(Self::SingleDay(start));
        }
        let dates = start.iter_days().take_while(|d| *d <= end).collect();
        Ok(Self::MultiDay(dates))
    }

    pub fn dates(&self) -> &[NaiveDate] {
        match self {
            Self::SingleDay(date) => std::slice::from_ref(date),
            Self::MultiDay(dates) => dates,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.dates()[0]
    }

    pub fn end(&self) -> NaiveDate {
        let dates = self.dates();
        dates[dates.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.dates().len()
    }

    pub fn is_multi_day(&self) -> bool {
        matches!(self, Self::MultiDay(_))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates().contains(&date)
    }
}

/// Start and end time of a timed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A logical calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier; holiday records use their name
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub span: EventSpan,
    /// `None` when the source carries no time data
    pub time: Option<EventTime>,
    pub all_day: bool,
    pub source: EventSource,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl EventRecord {
    /// Create a single-day, untimed user event.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, EventValidationError> {
        Self::builder().name(name).start(date).build()
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventRecordBuilder {
        EventRecordBuilder::new()
    }

    /// Validate the record
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.name.trim().is_empty() {
            return Err(EventValidationError::EmptyName);
        }
        if self.category_id.trim().is_empty() {
            return Err(EventValidationError::EmptyCategory);
        }
        if let EventSpan::MultiDay(dates) = &self.span {
            if dates.len() < 2 {
                return Err(EventValidationError::DegenerateSpan);
            }
            if dates.windows(2).any(|pair| pair[1] <= pair[0]) {
                return Err(EventValidationError::UnorderedSpan);
            }
        }
        if let Some(time) = self.time {
            if !self.span.is_multi_day() && time.end < time.start {
                return Err(EventValidationError::EndBeforeStart);
            }
        }
        Ok(())
    }

    /// Year of the first spanned date; the event store buckets records by it.
    pub fn start_year(&self) -> i32 {
        self.span.start().year()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        self.span.dates()
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.time.map(|t| t.start)
    }

    pub fn is_user_event(&self) -> bool {
        self.source == EventSource::User
    }
}

/// Validation errors for EventRecord.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    #[error("Event name cannot be empty")]
    EmptyName,
    #[error("Event category cannot be empty")]
    EmptyCategory,
    #[error("Event start date is required")]
    MissingStart,
    #[error("Event end must not be before its start")]
    EndBeforeStart,
    #[error("Multi-day events must span at least two dates")]
    DegenerateSpan,
    #[error("Multi-day event dates must be strictly increasing")]
    UnorderedSpan,
}

/// Builder for creating event records with optional fields
#[derive(Debug, Default)]
pub struct EventRecordBuilder {
    id: Option<String>,
    name: Option<String>,
    category_id: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    time: Option<EventTime>,
    all_day: bool,
    source: Option<EventSource>,
    location: Option<String>,
    notes: Option<String>,
}

impl EventRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn start(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    /// Last covered date (inclusive). Defaults to the start date.
    pub fn end(mut self, date: NaiveDate) -> Self {
        self.end = Some(date);
        self
    }

    pub fn time(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.time = Some(EventTime { start, end });
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn source(mut self, source: EventSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Build the record. An empty id is left for the event store to assign.
    pub fn build(self) -> Result<EventRecord, EventValidationError> {
        let name = self.name.ok_or(EventValidationError::EmptyName)?;
        let start = self.start.ok_or(EventValidationError::MissingStart)?;
        let span = EventSpan::between(start, self.end.unwrap_or(start))?;

        let record = EventRecord {
            id: self.id.unwrap_or_default(),
            name,
            category_id: self
                .category_id
                .unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()),
            span,
            time: self.time,
            all_day: self.all_day,
            source: self.source.unwrap_or(EventSource::User),
            location: self.location,
            notes: self.notes,
        };

        record.validate()?;
        Ok(record)
    }
}
