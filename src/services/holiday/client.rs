use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::thread;
use std::time::Duration;

const CALENDARIFIC_URL: &str = "https://calendarific.com/api/v2/holidays";

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "CALENDARIFIC_API_KEY";

/// A public holiday as reported by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    pub name: String,
    pub date: NaiveDate,
}

/// Source of public holidays for a country and year.
pub trait HolidayClient {
    fn fetch(&self, country: &str, year: i32) -> Result<Vec<Holiday>>;
}

#[derive(Debug, Deserialize)]
struct FeedBody {
    response: FeedResponse,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    holidays: Vec<FeedHoliday>,
}

#[derive(Debug, Deserialize)]
struct FeedHoliday {
    name: String,
    date: FeedDate,
}

#[derive(Debug, Deserialize)]
struct FeedDate {
    datetime: FeedDateTime,
}

#[derive(Debug, Deserialize)]
struct FeedDateTime {
    year: i32,
    month: u32,
    day: u32,
}

/// Parse a Calendarific holidays response body.
///
/// Entries with an impossible date are skipped with a warning.
pub fn parse_holidays(body: &[u8]) -> Result<Vec<Holiday>> {
    let body: FeedBody =
        serde_json::from_slice(body).context("Holiday response is not valid feed JSON")?;

    let holidays = body
        .response
        .holidays
        .into_iter()
        .filter_map(|entry| {
            let FeedDateTime { year, month, day } = entry.date.datetime;
            match NaiveDate::from_ymd_opt(year, month, day) {
                Some(date) => Some(Holiday {
                    name: entry.name,
                    date,
                }),
                None => {
                    log::warn!(
                        "Skipping holiday '{}' with invalid date {}-{}-{}",
                        entry.name,
                        year,
                        month,
                        day
                    );
                    None
                }
            }
        })
        .collect();

    Ok(holidays)
}

/// Blocking client for the Calendarific holiday API.
pub struct CalendarificClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_response_bytes: usize,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl CalendarificClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .context("Failed to build holiday feed HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: CALENDARIFIC_URL.to_string(),
            max_response_bytes: 5 * 1024 * 1024,
            max_retries: 2,
            retry_delay_ms: 400,
        })
    }

    /// Use the configured key, falling back to the environment.
    pub fn from_settings(api_key: Option<&str>) -> Result<Self> {
        let key = match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => key.to_string(),
            None => std::env::var(API_KEY_ENV)
                .with_context(|| format!("No holiday API key configured and {} is not set", API_KEY_ENV))?,
        };
        Self::new(key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn fetch_once(&self, country: &str, year: i32) -> Result<Vec<Holiday>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("country", country),
                ("year", &year.to_string()),
            ])
            .send()
            .context("Network error during holiday fetch")?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(anyhow!("Holiday fetch failed with HTTP status {}", status));
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_bytes {
                return Err(anyhow!(
                    "Holiday response too large ({} bytes > {} bytes)",
                    content_length,
                    self.max_response_bytes
                ));
            }
        }

        let bytes = response
            .bytes()
            .context("Failed to read holiday response body")?;

        if bytes.len() > self.max_response_bytes {
            return Err(anyhow!(
                "Holiday response too large ({} bytes > {} bytes)",
                bytes.len(),
                self.max_response_bytes
            ));
        }

        parse_holidays(&bytes)
    }
}

impl HolidayClient for CalendarificClient {
    fn fetch(&self, country: &str, year: i32) -> Result<Vec<Holiday>> {
        if !self.base_url.starts_with("https://") {
            return Err(anyhow!("Holiday feed URL must use HTTPS"));
        }

        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..=self.max_retries {
            match self.fetch_once(country, year) {
                Ok(holidays) => return Ok(holidays),
                Err(err) => {
                    let is_last_attempt = attempt == self.max_retries;
                    if is_last_attempt {
                        last_error = Some(err.context(format!(
                            "Failed to fetch holidays for {} {} after {} attempts",
                            country,
                            year,
                            attempt + 1
                        )));
                    } else {
                        log::warn!(
                            "Holiday fetch attempt {} failed for {} {}: {}",
                            attempt + 1,
                            country,
                            year,
                            err
                        );
                        thread::sleep(Duration::from_millis(self.retry_delay_ms));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("Unknown holiday fetch error")))
    }
}
