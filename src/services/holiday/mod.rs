//! Public holiday feed.
//!
//! Holidays are fetched per country and year, deduplicated by name and turned
//! into read-only event records shown beside the user's own events.

use std::collections::{HashMap, HashSet};

use crate::models::category::HOLIDAY_CATEGORY_ID;
use crate::models::event::{EventRecord, EventSource};
use crate::utils::date::DateRange;

mod client;

pub use client::{parse_holidays, CalendarificClient, Holiday, HolidayClient, API_KEY_ENV};

/// Turns feed holidays into event records, caching each (country, year).
pub struct HolidayService {
    client: Box<dyn HolidayClient>,
    cache: HashMap<(String, i32), Vec<EventRecord>>,
}

impl HolidayService {
    pub fn new(client: Box<dyn HolidayClient>) -> Self {
        Self {
            client,
            cache: HashMap::new(),
        }
    }

    /// Holiday records for one country and year.
    ///
    /// A failed fetch is logged and yields no records; it is not cached, so
    /// the next call tries again.
    pub fn records(&mut self, country: &str, year: i32) -> Vec<EventRecord> {
        let key = (country.to_uppercase(), year);
        if let Some(records) = self.cache.get(&key) {
            return records.clone();
        }

        match self.client.fetch(&key.0, year) {
            Ok(holidays) => {
                let records = to_records(holidays);
                log::info!(
                    "Loaded {} holidays for {} {}",
                    records.len(),
                    key.0,
                    year
                );
                self.cache.insert(key, records.clone());
                records
            }
            Err(err) => {
                log::error!("Holiday feed unavailable for {} {}: {:#}", key.0, year, err);
                Vec::new()
            }
        }
    }

    /// Holiday records falling inside `range`, across every year it touches.
    pub fn records_for_range(&mut self, country: &str, range: &DateRange) -> Vec<EventRecord> {
        range
            .years()
            .into_iter()
            .flat_map(|year| self.records(country, year))
            .filter(|record| range.intersects(record.dates()))
            .collect()
    }

    pub fn is_cached(&self, country: &str, year: i32) -> bool {
        self.cache.contains_key(&(country.to_uppercase(), year))
    }
}

/// Keep the first holiday of each name and build its record.
fn to_records(holidays: Vec<Holiday>) -> Vec<EventRecord> {
    let mut seen = HashSet::new();
    holidays
        .into_iter()
        .filter(|holiday| seen.insert(holiday.name.clone()))
        .filter_map(|holiday| {
            EventRecord::builder()
                .id(holiday.name.clone())
                .name(holiday.name)
                .category(HOLIDAY_CATEGORY_ID)
                .start(holiday.date)
                .all_day(true)
                .source(EventSource::Holiday)
                .build()
                .map_err(|e| log::warn!("Skipping holiday record: {}", e))
                .ok()
        })
        .collect()
}
