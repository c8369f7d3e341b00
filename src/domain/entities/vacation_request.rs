use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest free-text reason accepted on submission or rejection.
pub const MAX_REASON_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VacationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacationStatus::Pending => "pending",
            VacationStatus::Approved => "approved",
            VacationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VacationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VacationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VacationStatus::Pending),
            "approved" => Ok(VacationStatus::Approved),
            "rejected" => Ok(VacationStatus::Rejected),
            other => Err(format!("Unknown vacation status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRequest {
    pub id: String,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub status: VacationStatus,
    pub reason: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl VacationRequest {
    /// Builds a fresh pending request. `created_at` is supplied by the caller's clock.
    pub fn new(
        user_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_days: i64,
        reason: Option<String>,
        created_at: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            start_date,
            end_date,
            total_days,
            status: VacationStatus::Pending,
            reason,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            created_at: created_at.clone(),
            updated_at: created_at,
        }
    }
}

/// Optional filters for listing requests. `year` matches the start date's year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestFilter {
    pub user_id: Option<String>,
    pub status: Option<VacationStatus>,
    pub year: Option<i32>,
}

impl RequestFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: VacationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// Result of a committed approval: the updated request and the owner's new balance.
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub request: VacationRequest,
    pub previous_balance: i64,
    pub new_balance: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    pub submitted: i64,
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
    pub days_used: i64,
}

/// Monthly statistics together with the distribution settings read from the newsletter policy.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub stats: MonthlyStats,
    pub distribute: bool,
    pub recipients: Vec<String>,
    pub send_day: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            VacationStatus::Pending,
            VacationStatus::Approved,
            VacationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<VacationStatus>(), Ok(status));
        }
        assert!("cancelled".parse::<VacationStatus>().is_err());
    }

    #[test]
    fn test_new_request_is_pending_and_unreviewed() {
        let req = VacationRequest::new(
            "u1".to_string(),
            date(2024, 1, 15),
            date(2024, 1, 19),
            5,
            None,
            "2024-01-10T09:00:00.000Z".to_string(),
        );
        assert_eq!(req.status, VacationStatus::Pending);
        assert!(req.reviewed_by.is_none());
        assert_eq!(req.created_at, req.updated_at);
    }
}
