use crate::domain::entities::Settings;
use crate::domain::errors::VacationResult;
use async_trait::async_trait;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_settings(&self) -> VacationResult<Option<Settings>>;

    /// Upserts the singleton row.
    async fn save_settings(&self, settings: &Settings) -> VacationResult<()>;
}
