use chrono::{NaiveDate, NaiveTime};
use rusqlite::{self, Result};

use crate::models::event::{EventSpan, EventTime};

const TIME_FORMAT: &str = "%H:%M";

pub(crate) fn serialize_dates(span: &EventSpan) -> String {
    serde_json::to_string(span.dates()).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn deserialize_span(json: String) -> Result<EventSpan> {
    let dates: Vec<NaiveDate> = serde_json::from_str(&json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;

    match dates.as_slice() {
        [] => Err(rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            "event has no dates".into(),
        )),
        [single] => Ok(EventSpan::SingleDay(*single)),
        _ => Ok(EventSpan::MultiDay(dates)),
    }
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub(crate) fn parse_time_pair(start: Option<String>, end: Option<String>) -> Result<Option<EventTime>> {
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(None);
    };

    let parse = |value: &str| {
        NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
    };

    Ok(Some(EventTime {
        start: parse(&start)?,
        end: parse(&end)?,
    }))
}
