use crate::domain::entities::{NewsletterPolicy, Settings, WeekendPolicy};
use crate::domain::errors::{VacationError, VacationResult};
use crate::domain::ports::settings_repository::SettingsRepository;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::Row;

// The table holds a single row pinned to this id.
const SETTINGS_ROW_ID: i64 = 1;

#[async_trait]
impl SettingsRepository for Database {
    async fn get_settings(&self) -> VacationResult<Option<Settings>> {
        let row = sqlx::query(
            "SELECT weekend_policy, default_vacation_days, vacation_reset_month, newsletter,
                    last_reset_year, updated_at
             FROM settings WHERE id = ?",
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let weekend_policy: WeekendPolicy =
            serde_json::from_str(&row.try_get::<String, _>("weekend_policy")?)?;
        let newsletter: NewsletterPolicy =
            serde_json::from_str(&row.try_get::<String, _>("newsletter")?)?;
        let reset_month = row.try_get::<i64, _>("vacation_reset_month")?;

        Ok(Some(Settings {
            weekend_policy,
            default_vacation_days: row.try_get("default_vacation_days")?,
            vacation_reset_month: u32::try_from(reset_month).map_err(|_| {
                VacationError::Storage("Corrupt settings record".to_string())
            })?,
            newsletter,
            last_reset_year: row
                .try_get::<Option<i64>, _>("last_reset_year")
                .ok()
                .flatten()
                .and_then(|year| i32::try_from(year).ok()),
            updated_at: row.try_get("updated_at")?,
        }))
    }

    async fn save_settings(&self, settings: &Settings) -> VacationResult<()> {
        let weekend_policy = serde_json::to_string(&settings.weekend_policy)?;
        let newsletter = serde_json::to_string(&settings.newsletter)?;

        // last_reset_year is written on first insert only; the balance reset owns it afterwards
        sqlx::query(
            "INSERT INTO settings (id, weekend_policy, default_vacation_days, vacation_reset_month,
                 newsletter, last_reset_year, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 weekend_policy = excluded.weekend_policy,
                 default_vacation_days = excluded.default_vacation_days,
                 vacation_reset_month = excluded.vacation_reset_month,
                 newsletter = excluded.newsletter,
                 updated_at = excluded.updated_at",
        )
        .bind(SETTINGS_ROW_ID)
        .bind(weekend_policy)
        .bind(settings.default_vacation_days)
        .bind(i64::from(settings.vacation_reset_month))
        .bind(newsletter)
        .bind(settings.last_reset_year.map(i64::from))
        .bind(&settings.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
