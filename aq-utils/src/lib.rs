//! Shared utility functions for the air-quality crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, TimeDelta};

    /// Query/CSV date format: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
    }

    /// Day of the calendar year, 1-366.
    pub fn day_of_year(date: &NaiveDate) -> u32 {
        date.ordinal()
    }

    /// The calendar day after `date`, saturating at the last representable date.
    pub fn next_day(date: &NaiveDate) -> NaiveDate {
        date.succ_opt().unwrap_or(*date)
    }

    /// Inclusive `(start, end)` window of `days` days ending on `end`.
    pub fn trailing_window(end: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
        let start = TimeDelta::try_days(days)
            .and_then(|delta| end.checked_sub_signed(delta))
            .unwrap_or(NaiveDate::MIN);
        (start, end)
    }

    /// A date range iterator that yields each date from the start date
    /// through the end date (inclusive).
    #[derive(Clone, Eq, PartialEq, Copy, Debug)]
    pub struct DateRange(pub NaiveDate, pub NaiveDate);

    impl Iterator for DateRange {
        type Item = NaiveDate;
        fn next(&mut self) -> Option<Self::Item> {
            if self.0 > self.1 {
                return None;
            }
            let current = self.0;
            match current.succ_opt() {
                Some(next) => self.0 = next,
                // last representable date: close the range after yielding it
                None => self.1 = current.pred_opt()?,
            }
            Some(current)
        }
    }

}
