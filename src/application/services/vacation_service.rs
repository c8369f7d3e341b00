use crate::application::services::SettingsService;
use crate::domain::entities::{
    MonthlyReport, MonthlyStats, RequestFilter, VacationRequest, MAX_REASON_LENGTH,
};
use crate::domain::errors::{VacationError, VacationResult};
use crate::domain::ports::clock::Clock;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::ports::vacation_request_repository::VacationRequestRepository;
use crate::domain::services::{
    compute_business_days, ensure_cancellable, ensure_reviewable, format_timestamp, month_bounds,
    parse_request_date, OverlapPolicy, ReviewAction,
};
use crate::infrastructure::observability::{
    DAYS_APPROVED, REQUESTS_APPROVED, REQUESTS_CANCELLED, REQUESTS_REJECTED, REQUESTS_SUBMITTED,
};
use chrono::NaiveDate;
use std::sync::Arc;

/// Trims free text, drops it when empty, and enforces the length bound.
fn normalize_reason(reason: Option<&str>) -> VacationResult<Option<String>> {
    let Some(trimmed) = reason.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    if trimmed.chars().count() > MAX_REASON_LENGTH {
        return Err(VacationError::Validation(format!(
            "Reason must be at most {} characters",
            MAX_REASON_LENGTH
        )));
    }

    Ok(Some(trimmed.to_string()))
}

/// Vacation request lifecycle: submit, review, cancel and reporting.
#[derive(Clone)]
pub struct VacationService {
    request_repo: Arc<dyn VacationRequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    settings: SettingsService,
    clock: Arc<dyn Clock>,
    overlap_policy: OverlapPolicy,
}

impl VacationService {
    pub fn new(
        request_repo: Arc<dyn VacationRequestRepository>,
        user_repo: Arc<dyn UserRepository>,
        settings: SettingsService,
        clock: Arc<dyn Clock>,
        overlap_policy: OverlapPolicy,
    ) -> Self {
        Self {
            request_repo,
            user_repo,
            settings,
            clock,
            overlap_policy,
        }
    }

    #[tracing::instrument(skip(self, reason))]
    pub async fn submit(
        &self,
        user_id: &str,
        raw_start: &str,
        raw_end: &str,
        reason: Option<&str>,
    ) -> VacationResult<VacationRequest> {
        let start = parse_request_date(raw_start)?;
        let end = parse_request_date(raw_end)?;

        if end < start {
            return Err(VacationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let today = self.clock.today();
        if start < today {
            return Err(VacationError::DateInPast {
                start: start.to_string(),
                today: today.to_string(),
            });
        }

        let reason = normalize_reason(reason)?;

        // Fresh policy snapshot per submission
        let settings = self.settings.get().await?;
        let total_days = compute_business_days(start, end, &settings.weekend_policy);

        let user = self
            .user_repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| VacationError::UserNotFound(user_id.to_string()))?;

        // Advisory only: nothing is reserved until approval
        if total_days > user.vacation_balance {
            return Err(VacationError::InsufficientBalance {
                requested: total_days,
                available: user.vacation_balance,
            });
        }

        let overlapping = self.has_overlap(user_id, start, end).await?;
        self.overlap_policy.check(user_id, start, end, overlapping)?;

        if total_days == 0 {
            tracing::warn!(
                "Request {}..={} for user {} contains no business days",
                start,
                end,
                user_id
            );
        }

        let request = VacationRequest::new(
            user.id,
            start,
            end,
            total_days,
            reason,
            format_timestamp(self.clock.now()),
        );
        self.request_repo.create_request(&request).await?;

        metrics::counter!(REQUESTS_SUBMITTED).increment(1);
        tracing::info!(
            "Vacation request {} submitted by {} ({} business days)",
            request.id,
            request.user_id,
            total_days
        );

        Ok(request)
    }

    /// Whether `[start, end]` intersects a pending or approved request of the user.
    pub async fn has_overlap(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> VacationResult<bool> {
        Ok(!self
            .overlapping_requests(user_id, start, end)
            .await?
            .is_empty())
    }

    pub async fn overlapping_requests(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> VacationResult<Vec<VacationRequest>> {
        self.request_repo.find_overlapping(user_id, start, end).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn approve(
        &self,
        request_id: &str,
        reviewer_id: &str,
    ) -> VacationResult<VacationRequest> {
        let request = self.get_request(request_id).await?;
        ensure_reviewable(&request, ReviewAction::Approve)?;

        let reviewed_at = format_timestamp(self.clock.now());
        let Some(outcome) = self
            .request_repo
            .approve_pending(request_id, reviewer_id, &reviewed_at)
            .await?
        else {
            return Err(self.lost_review_race(request_id).await);
        };

        metrics::counter!(REQUESTS_APPROVED).increment(1);
        metrics::counter!(DAYS_APPROVED).increment(outcome.request.total_days.max(0) as u64);
        tracing::info!(
            "Vacation request {} approved by {}; balance of {} {} -> {}",
            request_id,
            reviewer_id,
            outcome.request.user_id,
            outcome.previous_balance,
            outcome.new_balance
        );
        if outcome.previous_balance < outcome.request.total_days {
            tracing::warn!(
                "Approval of {} exceeded the remaining balance; clamped at zero",
                request_id
            );
        }

        Ok(outcome.request)
    }

    #[tracing::instrument(skip(self, reason))]
    pub async fn reject(
        &self,
        request_id: &str,
        reviewer_id: &str,
        reason: Option<&str>,
    ) -> VacationResult<VacationRequest> {
        let request = self.get_request(request_id).await?;
        ensure_reviewable(&request, ReviewAction::Reject)?;

        let reason = normalize_reason(reason)?;
        let reviewed_at = format_timestamp(self.clock.now());

        let Some(rejected) = self
            .request_repo
            .reject_pending(request_id, reviewer_id, &reviewed_at, reason.as_deref())
            .await?
        else {
            return Err(self.lost_review_race(request_id).await);
        };

        metrics::counter!(REQUESTS_REJECTED).increment(1);
        tracing::info!("Vacation request {} rejected by {}", request_id, reviewer_id);

        Ok(rejected)
    }

    /// Withdraws a pending request by deleting it. Only the owner may cancel.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, request_id: &str, caller_id: &str) -> VacationResult<()> {
        let request = self.get_request(request_id).await?;

        if request.user_id != caller_id {
            return Err(VacationError::Forbidden(
                "Only the owner can cancel a vacation request".to_string(),
            ));
        }

        ensure_cancellable(request.status)?;

        if !self.request_repo.delete_pending(request_id).await? {
            // Reviewed between the read and the delete
            let current = self.get_request(request_id).await?;
            ensure_cancellable(current.status)?;
            return Err(VacationError::Storage(
                "Pending request could not be deleted".to_string(),
            ));
        }

        metrics::counter!(REQUESTS_CANCELLED).increment(1);
        tracing::info!("Vacation request {} cancelled by {}", request_id, caller_id);

        Ok(())
    }

    pub async fn get_request(&self, request_id: &str) -> VacationResult<VacationRequest> {
        self.request_repo
            .get_request(request_id)
            .await?
            .ok_or_else(|| VacationError::RequestNotFound(request_id.to_string()))
    }

    pub async fn list_requests(&self, filter: &RequestFilter) -> VacationResult<Vec<VacationRequest>> {
        self.request_repo.list_requests(filter).await
    }

    /// Review queue, oldest first.
    pub async fn list_pending(&self) -> VacationResult<Vec<VacationRequest>> {
        self.request_repo.list_pending().await
    }

    /// Counts requests created during the month; `days_used` covers approved ones only.
    pub async fn monthly_stats(&self, year: i32, month: u32) -> VacationResult<MonthlyStats> {
        let (from, to) = month_bounds(year, month)?;
        self.request_repo.monthly_stats(&from, &to).await
    }

    pub async fn monthly_report(&self, year: i32, month: u32) -> VacationResult<MonthlyReport> {
        let stats = self.monthly_stats(year, month).await?;
        let newsletter = self.settings.get().await?.newsletter;

        Ok(MonthlyReport {
            year,
            month,
            stats,
            distribute: newsletter.enabled && !newsletter.recipients.is_empty(),
            recipients: newsletter.recipients,
            send_day: newsletter.day_of_month,
        })
    }

    /// Error for a review whose conditional write matched no pending row.
    async fn lost_review_race(&self, request_id: &str) -> VacationError {
        match self.request_repo.get_request(request_id).await {
            Ok(Some(current)) => VacationError::RequestAlreadyProcessed {
                id: request_id.to_string(),
                status: current.status.to_string(),
            },
            Ok(None) => VacationError::RequestNotFound(request_id.to_string()),
            Err(e) => e,
        }
    }
}
