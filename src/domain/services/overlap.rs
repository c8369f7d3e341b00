use crate::domain::errors::{VacationError, VacationResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What submission does when the candidate range overlaps a pending or
/// approved request of the same user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Accept and leave the conflict to the reviewer.
    #[default]
    Allow,
    Reject,
}

impl OverlapPolicy {
    pub fn check(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        overlapping: bool,
    ) -> VacationResult<()> {
        if !overlapping {
            return Ok(());
        }

        match self {
            OverlapPolicy::Allow => {
                tracing::warn!(
                    "User {} submitted {}..={} overlapping an existing request",
                    user_id,
                    start,
                    end
                );
                Ok(())
            }
            OverlapPolicy::Reject => Err(VacationError::OverlappingRequest {
                start: start.to_string(),
                end: end.to_string(),
            }),
        }
    }
}

impl std::str::FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(OverlapPolicy::Allow),
            "reject" => Ok(OverlapPolicy::Reject),
            other => Err(format!("Unknown overlap policy: {}", other)),
        }
    }
}
