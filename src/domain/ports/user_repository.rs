use crate::domain::entities::User;
use crate::domain::errors::VacationResult;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> VacationResult<()>;
    async fn get_user_by_id(&self, id: &str) -> VacationResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> VacationResult<Option<User>>;
    async fn count_admin_users(&self) -> VacationResult<i64>;
}
