use crate::domain::entities::{VacationRequest, VacationStatus};
use crate::domain::errors::{VacationError, VacationResult};

/// Review operations a pending request can undergo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn target(&self) -> VacationStatus {
        match self {
            ReviewAction::Approve => VacationStatus::Approved,
            ReviewAction::Reject => VacationStatus::Rejected,
        }
    }
}

/// Validates if a status transition is allowed.
pub fn validate_transition(
    request_id: &str,
    from: VacationStatus,
    to: VacationStatus,
) -> VacationResult<()> {
    use VacationStatus::*;

    match (from, to) {
        (Pending, Approved) | (Pending, Rejected) => Ok(()),
        // Repeating a review is an error, never a no-op
        (Approved, _) | (Rejected, _) => Err(VacationError::RequestAlreadyProcessed {
            id: request_id.to_string(),
            status: from.to_string(),
        }),
        (Pending, Pending) => Err(VacationError::Validation(
            "Request is already pending".to_string(),
        )),
    }
}

pub fn ensure_reviewable(request: &VacationRequest, action: ReviewAction) -> VacationResult<()> {
    validate_transition(&request.id, request.status, action.target())
}

/// Only pending requests may be withdrawn.
pub fn ensure_cancellable(status: VacationStatus) -> VacationResult<()> {
    match status {
        VacationStatus::Pending => Ok(()),
        VacationStatus::Approved => Err(VacationError::CannotCancelApproved),
        VacationStatus::Rejected => Err(VacationError::CannotCancelRejected),
    }
}
