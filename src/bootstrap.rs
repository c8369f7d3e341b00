use crate::application::services::*;
use crate::config::Config;
use crate::domain::entities::UserRole;
use crate::domain::errors::VacationResult;
use crate::domain::ports::balance_ledger::BalanceLedger;
use crate::domain::ports::clock::Clock;
use crate::domain::ports::settings_repository::SettingsRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::ports::vacation_request_repository::VacationRequestRepository;
use crate::infrastructure::persistence::Database;
use std::sync::Arc;

/// Wired services handed to the (external) transport layer.
#[derive(Clone)]
pub struct AppState {
    pub vacation_service: VacationService,
    pub settings_service: SettingsService,
    pub balance_service: BalanceService,
    pub user_service: UserService,
}

pub fn build_app_state(db: Database, config: &Config, clock: Arc<dyn Clock>) -> AppState {
    let settings_service = SettingsService::new(
        Arc::new(db.clone()) as Arc<dyn SettingsRepository>,
        clock.clone(),
        config.default_vacation_days,
    );

    let vacation_service = VacationService::new(
        Arc::new(db.clone()) as Arc<dyn VacationRequestRepository>,
        Arc::new(db.clone()) as Arc<dyn UserRepository>,
        settings_service.clone(),
        clock.clone(),
        config.overlap_policy,
    );

    let balance_service = BalanceService::new(
        Arc::new(db.clone()) as Arc<dyn BalanceLedger>,
        settings_service.clone(),
        clock.clone(),
    );

    let user_service = UserService::new(
        Arc::new(db) as Arc<dyn UserRepository>,
        settings_service.clone(),
        clock,
    );

    tracing::info!(
        "Vacation services initialized (overlap policy: {:?})",
        config.overlap_policy
    );

    AppState {
        vacation_service,
        settings_service,
        balance_service,
        user_service,
    }
}

/// First-run seeding: the settings row, and an admin account when
/// `ADMIN_EMAIL` is configured and no admin exists yet.
pub async fn initialize(state: &AppState, config: &Config) -> VacationResult<()> {
    let settings = state.settings_service.get().await?;
    tracing::info!(
        "Active weekend policy: {:?}, reset month {}",
        settings.weekend_policy,
        settings.vacation_reset_month
    );

    let Some(admin_email) = &config.admin_email else {
        return Ok(());
    };

    if state.user_service.count_admin_users().await? > 0 {
        tracing::info!("Admin user already present");
        return Ok(());
    }

    let admin = state
        .user_service
        .create_user(admin_email, "Administrator", UserRole::Admin)
        .await?;
    tracing::info!("Admin user created: {}", admin.email);

    Ok(())
}
