use crate::application::services::SettingsService;
use crate::domain::errors::{VacationError, VacationResult};
use crate::domain::ports::balance_ledger::BalanceLedger;
use crate::domain::ports::clock::Clock;
use crate::domain::services::format_timestamp;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

/// Administrative access to the balance ledger. Approval deductions do not go
/// through here; they run inside the approval transaction.
#[derive(Clone)]
pub struct BalanceService {
    ledger: Arc<dyn BalanceLedger>,
    settings: SettingsService,
    clock: Arc<dyn Clock>,
}

impl BalanceService {
    pub fn new(ledger: Arc<dyn BalanceLedger>, settings: SettingsService, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger,
            settings,
            clock,
        }
    }

    pub async fn balance(&self, user_id: &str) -> VacationResult<i64> {
        self.ledger
            .get_balance(user_id)
            .await?
            .ok_or_else(|| VacationError::UserNotFound(user_id.to_string()))
    }

    /// Manual edit. Negative values are clamped to zero.
    #[tracing::instrument(skip(self))]
    pub async fn set_balance(&self, user_id: &str, balance: i64) -> VacationResult<i64> {
        let clamped = balance.max(0);
        if clamped != balance {
            tracing::warn!(
                "Balance {} for user {} is negative; storing 0",
                balance,
                user_id
            );
        }

        let updated = self
            .ledger
            .set_balance(user_id, clamped, &format_timestamp(self.clock.now()))
            .await?;
        if !updated {
            return Err(VacationError::UserNotFound(user_id.to_string()));
        }

        Ok(clamped)
    }

    /// Restores every balance to the default allotment once per year, the
    /// first time this runs on or after the start of the configured reset
    /// month. Returns the number of users reset (0 when nothing was due).
    #[tracing::instrument(skip(self))]
    pub async fn reset_balances(&self, today: NaiveDate) -> VacationResult<u64> {
        let settings = self.settings.get().await?;
        if today.month() < settings.vacation_reset_month {
            return Ok(0);
        }

        let reset = self
            .ledger
            .reset_balances(
                settings.default_vacation_days,
                today.year(),
                &format_timestamp(self.clock.now()),
            )
            .await?;

        match reset {
            Some(count) => {
                tracing::info!(
                    "Reset {} balances to {} days for {}",
                    count,
                    settings.default_vacation_days,
                    today.year()
                );
                Ok(count)
            }
            None => {
                tracing::debug!("Balances already reset for {}", today.year());
                Ok(0)
            }
        }
    }
}
