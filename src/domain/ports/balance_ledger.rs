use crate::domain::errors::VacationResult;
use async_trait::async_trait;

/// The user's remaining-entitlement counter.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    async fn get_balance(&self, user_id: &str) -> VacationResult<Option<i64>>;

    /// Writes `balance`, clamped at zero. Returns false if the user does not exist.
    async fn set_balance(&self, user_id: &str, balance: i64, updated_at: &str)
        -> VacationResult<bool>;

    /// Sets every user's balance to `balance` and records `period_year` as reset,
    /// in one transaction. Returns `None` if that year was already reset.
    async fn reset_balances(
        &self,
        balance: i64,
        period_year: i32,
        updated_at: &str,
    ) -> VacationResult<Option<u64>>;
}
