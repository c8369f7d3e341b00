use thiserror::Error;

/// Broad classes of failure a caller maps onto its own transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    BusinessRule,
    NotFound,
    Storage,
}

#[derive(Error, Debug)]
pub enum VacationError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange { start: String, end: String },
    #[error("Start date {start} is before today ({today})")]
    DateInPast { start: String, today: String },
    #[error("Insufficient balance: requested {requested} days, {available} available")]
    InsufficientBalance { requested: i64, available: i64 },
    #[error("Request {id} has already been {status}")]
    RequestAlreadyProcessed { id: String, status: String },
    #[error("Approved requests cannot be cancelled")]
    CannotCancelApproved,
    #[error("Rejected requests cannot be cancelled")]
    CannotCancelRejected,
    #[error("Requested range {start}..={end} overlaps an existing request")]
    OverlappingRequest { start: String, end: String },
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Vacation request {0} not found")]
    RequestNotFound(String),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Internal error: {0}")]
    Storage(String),
}

impl VacationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            VacationError::Validation(_) => "VALIDATION_ERROR",
            VacationError::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            VacationError::DateInPast { .. } => "DATE_IN_PAST",
            VacationError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            VacationError::RequestAlreadyProcessed { .. } => "REQUEST_ALREADY_PROCESSED",
            VacationError::CannotCancelApproved => "CANNOT_CANCEL_APPROVED",
            VacationError::CannotCancelRejected => "CANNOT_CANCEL_REJECTED",
            VacationError::OverlappingRequest { .. } => "OVERLAPPING_REQUEST",
            VacationError::Forbidden(_) => "FORBIDDEN",
            VacationError::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            VacationError::UserNotFound(_) => "USER_NOT_FOUND",
            VacationError::Storage(_) => "INTERNAL_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            VacationError::Validation(_)
            | VacationError::InvalidDateRange { .. }
            | VacationError::DateInPast { .. } => ErrorCategory::Validation,
            VacationError::InsufficientBalance { .. }
            | VacationError::RequestAlreadyProcessed { .. }
            | VacationError::CannotCancelApproved
            | VacationError::CannotCancelRejected
            | VacationError::OverlappingRequest { .. }
            | VacationError::Forbidden(_) => ErrorCategory::BusinessRule,
            VacationError::RequestNotFound(_) | VacationError::UserNotFound(_) => {
                ErrorCategory::NotFound
            }
            VacationError::Storage(_) => ErrorCategory::Storage,
        }
    }
}

// Storage failures are opaque to callers; the detail goes to the log only.
impl From<sqlx::Error> for VacationError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                tracing::error!("Database error: {}", db_err.message());
                VacationError::Storage("Database error".to_string())
            }
            sqlx::Error::PoolTimedOut => {
                tracing::error!("Database pool timed out");
                VacationError::Storage("Database unavailable".to_string())
            }
            other => {
                tracing::error!("Storage failure: {}", other);
                VacationError::Storage("Internal server error".to_string())
            }
        }
    }
}

impl From<serde_json::Error> for VacationError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Stored settings could not be decoded: {}", err);
        VacationError::Storage("Corrupt settings record".to_string())
    }
}

pub type VacationResult<T> = Result<T, VacationError>;
