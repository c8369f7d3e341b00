use crate::application::services::SettingsService;
use crate::domain::entities::{User, UserRole};
use crate::domain::errors::{VacationError, VacationResult};
use crate::domain::ports::clock::Clock;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::services::format_timestamp;
use crate::shared::utils::validate_and_normalize_email;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    settings: SettingsService,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, settings: SettingsService, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repo,
            settings,
            clock,
        }
    }

    /// Creates a user whose balance starts at the configured default allotment.
    #[tracing::instrument(skip(self))]
    pub async fn create_user(&self, email: &str, name: &str, role: UserRole) -> VacationResult<User> {
        let email = validate_and_normalize_email(email)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(VacationError::Validation("Name must not be empty".to_string()));
        }

        if self.user_repo.get_user_by_email(&email).await?.is_some() {
            return Err(VacationError::Validation(format!(
                "A user with email {} already exists",
                email
            )));
        }

        let settings = self.settings.get().await?;
        let user = User::new(
            email,
            name.to_string(),
            role,
            settings.default_vacation_days,
            format_timestamp(self.clock.now()),
        );
        self.user_repo.create_user(&user).await?;

        tracing::info!("Created {} {} with {} days", user.role, user.id, user.vacation_balance);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> VacationResult<User> {
        self.user_repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| VacationError::UserNotFound(user_id.to_string()))
    }

    pub async fn count_admin_users(&self) -> VacationResult<i64> {
        self.user_repo.count_admin_users().await
    }
}
