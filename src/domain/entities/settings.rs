use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_VACATION_DAYS: i64 = 25;
pub const MAX_VACATION_DAYS: i64 = 365;

/// Which weekdays are left out of business-day counts.
///
/// Weekday indices run 0 = Sunday through 6 = Saturday, so a Friday/Saturday
/// weekend is `{5, 6}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendPolicy {
    pub exclude_weekends: bool,
    pub excluded_days: BTreeSet<u32>,
}

impl WeekendPolicy {
    pub fn including_all_days() -> Self {
        Self {
            exclude_weekends: false,
            excluded_days: BTreeSet::new(),
        }
    }

    pub fn excluding(days: impl IntoIterator<Item = u32>) -> Self {
        Self {
            exclude_weekends: true,
            excluded_days: days.into_iter().collect(),
        }
    }

    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.exclude_weekends
            && self
                .excluded_days
                .contains(&date.weekday().num_days_from_sunday())
    }
}

impl Default for WeekendPolicy {
    fn default() -> Self {
        Self::excluding([0, 6])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterPolicy {
    pub enabled: bool,
    pub recipients: Vec<String>,
    pub day_of_month: u32,
}

impl Default for NewsletterPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            recipients: Vec::new(),
            day_of_month: 1,
        }
    }
}

/// The singleton policy record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub weekend_policy: WeekendPolicy,
    pub default_vacation_days: i64,
    pub vacation_reset_month: u32,
    pub newsletter: NewsletterPolicy,
    /// Year whose annual balance reset has been applied; maintained by the ledger.
    #[serde(default)]
    pub last_reset_year: Option<i32>,
    pub updated_at: String,
}

impl Settings {
    pub fn with_defaults(default_vacation_days: i64, updated_at: String) -> Self {
        Self {
            weekend_policy: WeekendPolicy::default(),
            default_vacation_days,
            vacation_reset_month: 1,
            newsletter: NewsletterPolicy::default(),
            last_reset_year: None,
            updated_at,
        }
    }

    /// Returns a description of the first invalid field, if any.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(day) = self
            .weekend_policy
            .excluded_days
            .iter()
            .find(|d| **d > 6)
        {
            return Err(format!(
                "Excluded weekday index {} is outside 0 (Sunday) to 6 (Saturday)",
                day
            ));
        }
        if !(0..=MAX_VACATION_DAYS).contains(&self.default_vacation_days) {
            return Err(format!(
                "Default vacation days must be between 0 and {}",
                MAX_VACATION_DAYS
            ));
        }
        if !(1..=12).contains(&self.vacation_reset_month) {
            return Err("Vacation reset month must be between 1 and 12".to_string());
        }
        if !(1..=28).contains(&self.newsletter.day_of_month) {
            return Err("Newsletter day of month must be between 1 and 28".to_string());
        }
        if self.newsletter.enabled && self.newsletter.recipients.is_empty() {
            return Err("An enabled newsletter needs at least one recipient".to_string());
        }
        Ok(())
    }
}
