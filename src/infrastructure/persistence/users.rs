use crate::domain::entities::{User, UserRole};
use crate::domain::errors::VacationResult;
use crate::domain::ports::balance_ledger::BalanceLedger;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};

const USER_COLUMNS: &str = "id, email, name, role, vacation_balance, created_at, updated_at";

fn row_to_user(row: &AnyRow) -> VacationResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        role: UserRole::from(row.try_get::<String, _>("role")?),
        vacation_balance: row.try_get("vacation_balance")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// Ledger helpers usable inside an open transaction
impl Database {
    pub(crate) async fn get_balance_internal<'e, E>(
        &self,
        executor: E,
        user_id: &str,
    ) -> VacationResult<Option<i64>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Any>,
    {
        let balance = sqlx::query_scalar::<_, i64>("SELECT vacation_balance FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;

        Ok(balance)
    }

    pub(crate) async fn set_balance_internal<'e, E>(
        &self,
        executor: E,
        user_id: &str,
        balance: i64,
        updated_at: &str,
    ) -> VacationResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Any>,
    {
        let result =
            sqlx::query("UPDATE users SET vacation_balance = ?, updated_at = ? WHERE id = ?")
                .bind(balance.max(0))
                .bind(updated_at)
                .bind(user_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn create_user(&self, user: &User) -> VacationResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, name, role, vacation_balance, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.vacation_balance)
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user_by_id(&self, id: &str) -> VacationResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> VacationResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn count_admin_users(&self) -> VacationResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl BalanceLedger for Database {
    async fn get_balance(&self, user_id: &str) -> VacationResult<Option<i64>> {
        self.get_balance_internal(&self.pool, user_id).await
    }

    async fn set_balance(
        &self,
        user_id: &str,
        balance: i64,
        updated_at: &str,
    ) -> VacationResult<bool> {
        self.set_balance_internal(&self.pool, user_id, balance, updated_at)
            .await
    }

    async fn reset_balances(
        &self,
        balance: i64,
        period_year: i32,
        updated_at: &str,
    ) -> VacationResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        // 1. Mark the year as reset, unless it already is
        let marked = sqlx::query(
            "UPDATE settings SET last_reset_year = ?, updated_at = ?
             WHERE id = 1 AND (last_reset_year IS NULL OR last_reset_year < ?)",
        )
        .bind(i64::from(period_year))
        .bind(updated_at)
        .bind(i64::from(period_year))
        .execute(&mut *tx)
        .await?;

        if marked.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        // 2. Restore every balance
        let result = sqlx::query("UPDATE users SET vacation_balance = ?, updated_at = ?")
            .bind(balance.max(0))
            .bind(updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(result.rows_affected()))
    }
}
