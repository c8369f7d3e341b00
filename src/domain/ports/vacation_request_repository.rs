use crate::domain::entities::{
    ApprovalOutcome, MonthlyStats, RequestFilter, VacationRequest,
};
use crate::domain::errors::VacationResult;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait VacationRequestRepository: Send + Sync {
    async fn create_request(&self, request: &VacationRequest) -> VacationResult<()>;

    async fn get_request(&self, id: &str) -> VacationResult<Option<VacationRequest>>;

    /// Requests matching every supplied filter, newest start date first
    async fn list_requests(&self, filter: &RequestFilter) -> VacationResult<Vec<VacationRequest>>;

    /// All pending requests, oldest submission first
    async fn list_pending(&self) -> VacationResult<Vec<VacationRequest>>;

    /// Pending or approved requests of `user_id` intersecting `[start, end]`
    async fn find_overlapping(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> VacationResult<Vec<VacationRequest>>;

    /// Atomically approve a pending request and deduct its days from the
    /// owner's balance (floored at zero).
    /// Returns `None` when the request is no longer pending.
    async fn approve_pending(
        &self,
        id: &str,
        reviewer_id: &str,
        reviewed_at: &str,
    ) -> VacationResult<Option<ApprovalOutcome>>;

    /// Returns `None` when the request is no longer pending.
    async fn reject_pending(
        &self,
        id: &str,
        reviewer_id: &str,
        reviewed_at: &str,
        rejection_reason: Option<&str>,
    ) -> VacationResult<Option<VacationRequest>>;

    /// Returns false when nothing was deleted because the request left pending.
    async fn delete_pending(&self, id: &str) -> VacationResult<bool>;

    /// Counts over requests whose `created_at` lies in `[from, to)`
    async fn monthly_stats(&self, from: &str, to: &str) -> VacationResult<MonthlyStats>;
}
