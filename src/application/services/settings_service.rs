use crate::domain::entities::{Settings, WeekendPolicy};
use crate::domain::errors::{VacationError, VacationResult};
use crate::domain::ports::clock::Clock;
use crate::domain::ports::settings_repository::SettingsRepository;
use crate::domain::services::format_timestamp;
use crate::shared::utils::validate_and_normalize_email;
use chrono::Datelike;
use std::sync::Arc;

/// Policy Store: read before every submission, written only by administrators.
#[derive(Clone)]
pub struct SettingsService {
    settings_repo: Arc<dyn SettingsRepository>,
    clock: Arc<dyn Clock>,
    default_vacation_days: i64,
}

impl SettingsService {
    pub fn new(
        settings_repo: Arc<dyn SettingsRepository>,
        clock: Arc<dyn Clock>,
        default_vacation_days: i64,
    ) -> Self {
        Self {
            settings_repo,
            clock,
            default_vacation_days,
        }
    }

    /// Current settings, creating the default row on first use.
    pub async fn get(&self) -> VacationResult<Settings> {
        if let Some(settings) = self.settings_repo.get_settings().await? {
            return Ok(settings);
        }

        let mut settings = Settings::with_defaults(
            self.default_vacation_days,
            format_timestamp(self.clock.now()),
        );
        // New users start with a full allotment, so the current year counts as reset
        settings.last_reset_year = Some(self.clock.today().year());
        self.settings_repo.save_settings(&settings).await?;

        tracing::info!(
            "Seeded default settings ({} vacation days, weekends excluded)",
            settings.default_vacation_days
        );
        Ok(settings)
    }

    #[tracing::instrument(skip(self, settings))]
    pub async fn update(&self, mut settings: Settings) -> VacationResult<Settings> {
        settings.validate().map_err(VacationError::Validation)?;

        settings.newsletter.recipients = settings
            .newsletter
            .recipients
            .iter()
            .map(|r| validate_and_normalize_email(r))
            .collect::<VacationResult<Vec<_>>>()?;
        // The reset marker belongs to the ledger; an update never moves it
        settings.last_reset_year = match self.settings_repo.get_settings().await? {
            Some(stored) => stored.last_reset_year,
            None => Some(self.clock.today().year()),
        };
        settings.updated_at = format_timestamp(self.clock.now());

        self.settings_repo.save_settings(&settings).await?;

        tracing::info!(
            "Settings updated: weekend policy {:?}, {} default days, reset month {}",
            settings.weekend_policy,
            settings.default_vacation_days,
            settings.vacation_reset_month
        );
        Ok(settings)
    }

    pub async fn update_weekend_policy(&self, policy: WeekendPolicy) -> VacationResult<Settings> {
        let mut settings = self.get().await?;
        settings.weekend_policy = policy;
        self.update(settings).await
    }
}
