use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now" for timestamps and of "today" for past-date checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date in the deployment's timezone.
    fn today(&self) -> NaiveDate;
}
