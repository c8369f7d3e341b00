use crate::domain::entities::{
    ApprovalOutcome, MonthlyStats, RequestFilter, VacationRequest, VacationStatus,
};
use crate::domain::errors::{VacationError, VacationResult};
use crate::domain::ports::vacation_request_repository::VacationRequestRepository;
use crate::domain::services::{from_storage_date, to_storage_date};
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{any::AnyRow, Row};

const REQUEST_COLUMNS: &str = "id, user_id, start_date, end_date, total_days, status, reason,
     reviewed_by, reviewed_at, rejection_reason, created_at, updated_at";

fn row_to_request(row: &AnyRow) -> VacationResult<VacationRequest> {
    let status: String = row.try_get("status")?;
    let status = status.parse::<VacationStatus>().map_err(|e| {
        tracing::error!("{}", e);
        VacationError::Storage("Corrupt status column".to_string())
    })?;

    Ok(VacationRequest {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        start_date: from_storage_date(&row.try_get::<String, _>("start_date")?)?,
        end_date: from_storage_date(&row.try_get::<String, _>("end_date")?)?,
        total_days: row.try_get("total_days")?,
        status,
        // The Any driver rejects NULL for Option<String>; absent means None
        reason: row.try_get::<Option<String>, _>("reason").ok().flatten(),
        reviewed_by: row
            .try_get::<Option<String>, _>("reviewed_by")
            .ok()
            .flatten(),
        reviewed_at: row
            .try_get::<Option<String>, _>("reviewed_at")
            .ok()
            .flatten(),
        rejection_reason: row
            .try_get::<Option<String>, _>("rejection_reason")
            .ok()
            .flatten(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// Internal helpers
impl Database {
    pub(crate) async fn get_request_internal<'e, E>(
        &self,
        executor: E,
        id: &str,
    ) -> VacationResult<Option<VacationRequest>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Any>,
    {
        let row = sqlx::query(&format!(
            "SELECT {} FROM vacation_requests WHERE id = ?",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        row.as_ref().map(row_to_request).transpose()
    }
}

#[async_trait]
impl VacationRequestRepository for Database {
    async fn create_request(&self, request: &VacationRequest) -> VacationResult<()> {
        sqlx::query(
            "INSERT INTO vacation_requests (id, user_id, start_date, end_date, total_days, status,
                 reason, reviewed_by, reviewed_at, rejection_reason, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.id)
        .bind(&request.user_id)
        .bind(to_storage_date(request.start_date))
        .bind(to_storage_date(request.end_date))
        .bind(request.total_days)
        .bind(request.status.as_str())
        .bind(request.reason.as_deref())
        .bind(request.reviewed_by.as_deref())
        .bind(request.reviewed_at.as_deref())
        .bind(request.rejection_reason.as_deref())
        .bind(&request.created_at)
        .bind(&request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_request(&self, id: &str) -> VacationResult<Option<VacationRequest>> {
        self.get_request_internal(&self.pool, id).await
    }

    async fn list_requests(&self, filter: &RequestFilter) -> VacationResult<Vec<VacationRequest>> {
        let mut sql = format!("SELECT {} FROM vacation_requests WHERE 1 = 1", REQUEST_COLUMNS);
        let mut params: Vec<String> = Vec::new();

        if let Some(user_id) = &filter.user_id {
            sql.push_str(" AND user_id = ?");
            params.push(user_id.clone());
        }
        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            params.push(status.as_str().to_string());
        }
        if let Some(year) = filter.year {
            sql.push_str(" AND substr(start_date, 1, 4) = ?");
            params.push(format!("{:04}", year));
        }
        sql.push_str(" ORDER BY start_date DESC, created_at DESC");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = query.bind(param);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_request).collect()
    }

    async fn list_pending(&self) -> VacationResult<Vec<VacationRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM vacation_requests WHERE status = ? ORDER BY created_at ASC",
            REQUEST_COLUMNS
        ))
        .bind(VacationStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_request).collect()
    }

    async fn find_overlapping(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> VacationResult<Vec<VacationRequest>> {
        // ISO dates compare correctly as text
        let rows = sqlx::query(&format!(
            "SELECT {} FROM vacation_requests
             WHERE user_id = ?
               AND status IN (?, ?)
               AND start_date <= ?
               AND end_date >= ?
             ORDER BY start_date ASC",
            REQUEST_COLUMNS
        ))
        .bind(user_id)
        .bind(VacationStatus::Pending.as_str())
        .bind(VacationStatus::Approved.as_str())
        .bind(to_storage_date(end))
        .bind(to_storage_date(start))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_request).collect()
    }

    /// Status change and balance deduction in one transaction.
    ///
    /// The conditional UPDATE runs first so the transaction holds the write
    /// lock before the balance is read; the read-modify-write on the balance
    /// therefore cannot interleave with another approval. Any error after
    /// `begin` drops the transaction uncommitted, rolling both writes back.
    async fn approve_pending(
        &self,
        id: &str,
        reviewer_id: &str,
        reviewed_at: &str,
    ) -> VacationResult<Option<ApprovalOutcome>> {
        let mut tx = self.pool.begin().await?;

        // 1. Claim the request while it is still pending
        let claimed = sqlx::query(
            "UPDATE vacation_requests
             SET status = ?, reviewed_by = ?, reviewed_at = ?, updated_at = ?
             WHERE id = ? AND status = ?",
        )
        .bind(VacationStatus::Approved.as_str())
        .bind(reviewer_id)
        .bind(reviewed_at)
        .bind(reviewed_at)
        .bind(id)
        .bind(VacationStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let request = self
            .get_request_internal(&mut *tx, id)
            .await?
            .ok_or_else(|| VacationError::RequestNotFound(id.to_string()))?;

        // 2. Deduct from the owner's balance, floored at zero
        let previous_balance = self
            .get_balance_internal(&mut *tx, &request.user_id)
            .await?
            .ok_or_else(|| VacationError::UserNotFound(request.user_id.clone()))?;
        let new_balance = (previous_balance - request.total_days).max(0);

        self.set_balance_internal(&mut *tx, &request.user_id, new_balance, reviewed_at)
            .await?;

        tx.commit().await?;

        Ok(Some(ApprovalOutcome {
            request,
            previous_balance,
            new_balance,
        }))
    }

    async fn reject_pending(
        &self,
        id: &str,
        reviewer_id: &str,
        reviewed_at: &str,
        rejection_reason: Option<&str>,
    ) -> VacationResult<Option<VacationRequest>> {
        let result = sqlx::query(
            "UPDATE vacation_requests
             SET status = ?, reviewed_by = ?, reviewed_at = ?, rejection_reason = ?, updated_at = ?
             WHERE id = ? AND status = ?",
        )
        .bind(VacationStatus::Rejected.as_str())
        .bind(reviewer_id)
        .bind(reviewed_at)
        .bind(rejection_reason)
        .bind(reviewed_at)
        .bind(id)
        .bind(VacationStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_request(id).await
    }

    async fn delete_pending(&self, id: &str) -> VacationResult<bool> {
        let result = sqlx::query("DELETE FROM vacation_requests WHERE id = ? AND status = ?")
            .bind(id)
            .bind(VacationStatus::Pending.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn monthly_stats(&self, from: &str, to: &str) -> VacationResult<MonthlyStats> {
        let row = sqlx::query(
            "SELECT
                 COUNT(*) AS submitted,
                 COALESCE(SUM(CASE WHEN status = 'approved' THEN 1 ELSE 0 END), 0) AS approved,
                 COALESCE(SUM(CASE WHEN status = 'rejected' THEN 1 ELSE 0 END), 0) AS rejected,
                 COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0) AS pending,
                 COALESCE(SUM(CASE WHEN status = 'approved' THEN total_days ELSE 0 END), 0) AS days_used
             FROM vacation_requests
             WHERE created_at >= ? AND created_at < ?",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(MonthlyStats {
            submitted: row.try_get("submitted")?,
            approved: row.try_get("approved")?,
            rejected: row.try_get("rejected")?,
            pending: row.try_get("pending")?,
            days_used: row.try_get("days_used")?,
        })
    }
}
