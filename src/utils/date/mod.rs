// Date utility functions
// Month grid arithmetic shared by the grid builder and the event store

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

/// Number of day cells in a rendered month grid (six weeks).
pub const GRID_CELLS: usize = 42;

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether any of `dates` falls inside the range.
    pub fn intersects(&self, dates: &[NaiveDate]) -> bool {
        dates.iter().any(|d| self.contains(*d))
    }

    /// Distinct years touched by the range, ascending.
    pub fn years(&self) -> Vec<i32> {
        (self.start.year()..=self.end.year()).collect()
    }
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// The 42 dates shown for `year`/`month`, Monday first, including the
/// leading and trailing days of the adjacent months.
pub fn month_grid_dates(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = first.weekday().num_days_from_monday() as i64;
    let grid_start = first - Duration::days(lead);
    Some(grid_start.iter_days().take(GRID_CELLS).collect())
}

/// Weekday index with Monday = 1 ... Sunday = 7.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse `HH:MM`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn test_month_grid_starts_on_monday() {
        // March 2025 starts on a Saturday
        let dates = month_grid_dates(2025, 3).unwrap();
        assert_eq!(dates.len(), GRID_CELLS);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
        assert_eq!(dates[5], NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(dates[41], NaiveDate::from_ymd_opt(2025, 4, 6).unwrap());
        assert!(dates.iter().step_by(7).all(|d| d.weekday() == Weekday::Mon));
    }

    #[test]
    fn test_month_starting_monday_has_no_leading_days() {
        // September 2025 starts on a Monday
        let dates = month_grid_dates(2025, 9).unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    }

    #[test]
    fn test_grid_range_years_span_new_year() {
        let dates = month_grid_dates(2025, 1).unwrap();
        let range = DateRange::new(dates[0], dates[GRID_CELLS - 1]);
        assert_eq!(range.years(), vec![2024, 2025]);
    }

    #[test]
    fn test_date_range_normalizes_order() {
        let a = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let range = DateRange::new(a, b);
        assert_eq!(range.start, b);
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 5, 11).unwrap()));
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()), 1);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()), 7);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_date("2025-03-04"), NaiveDate::from_ymd_opt(2025, 3, 4));
        assert_eq!(parse_date("04/03/2025"), None);
        assert_eq!(parse_time("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_time("9h"), None);
    }
}
