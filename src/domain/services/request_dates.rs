use crate::domain::errors::{VacationError, VacationResult};
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

const REQUEST_DATE_FORMAT: &str = "%d/%m/%Y";
const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

fn request_date_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("request date pattern is valid")
    })
}

/// Parses a caller-supplied `DD/MM/YYYY` date.
pub fn parse_request_date(text: &str) -> VacationResult<NaiveDate> {
    let trimmed = text.trim();
    if !request_date_shape().is_match(trimmed) {
        return Err(VacationError::Validation(format!(
            "Invalid date '{}': expected DD/MM/YYYY",
            trimmed
        )));
    }

    NaiveDate::parse_from_str(trimmed, REQUEST_DATE_FORMAT).map_err(|_| {
        VacationError::Validation(format!("Invalid date '{}': no such calendar day", trimmed))
    })
}

/// Renders a date in the external `DD/MM/YYYY` convention.
pub fn format_request_date(date: NaiveDate) -> String {
    date.format(REQUEST_DATE_FORMAT).to_string()
}

pub fn to_storage_date(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

pub fn from_storage_date(text: &str) -> VacationResult<NaiveDate> {
    NaiveDate::parse_from_str(text, STORAGE_DATE_FORMAT).map_err(|_| {
        tracing::error!("Stored date '{}' is not ISO formatted", text);
        VacationError::Storage("Corrupt date column".to_string())
    })
}

/// Timestamps are stored as RFC 3339 UTC with millisecond precision so that
/// lexical order matches chronological order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Half-open `[start, end)` timestamp bounds of a calendar month, in UTC.
pub fn month_bounds(year: i32, month: u32) -> VacationResult<(String, String)> {
    if !(1..=12).contains(&month) {
        return Err(VacationError::Validation(format!(
            "Month {} is outside 1-12",
            month
        )));
    }

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single();
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single();

    match (start, end) {
        (Some(start), Some(end)) => Ok((format_timestamp(start), format_timestamp(end))),
        _ => Err(VacationError::Validation(format!(
            "Year {} is out of range",
            year
        ))),
    }
}
