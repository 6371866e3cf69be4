use chrono::{DateTime, NaiveDate, Utc};

/// Current business date (UTC calendar day)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Calendar day of a timestamp
pub fn business_date(ts: &DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Parse a `YYYY-MM-DD` date as sent by report filters
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
