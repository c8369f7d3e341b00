use chrono::{DateTime, TimeZone, Utc};
use leavedesk::bootstrap::{build_app_state, AppState};
use leavedesk::config::Config;
use leavedesk::domain::entities::{User, UserRole};
use leavedesk::domain::ports::user_repository::UserRepository;
use leavedesk::domain::services::{format_timestamp, OverlapPolicy};
use leavedesk::infrastructure::persistence::Database;
use leavedesk::infrastructure::runtime::FixedClock;
use std::sync::Arc;

/// Wednesday 2024-01-10 09:00 UTC: before the scenario dates used in the tests.
pub fn default_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
}

pub fn test_config(overlap_policy: OverlapPolicy) -> Config {
    let mut config = Config::from_lookup(|_| None).expect("default config is valid");
    config.overlap_policy = overlap_policy;
    config
}

pub fn app_state_at(db: &Database, now: DateTime<Utc>, overlap_policy: OverlapPolicy) -> AppState {
    build_app_state(
        db.clone(),
        &test_config(overlap_policy),
        Arc::new(FixedClock::new(now)),
    )
}

pub fn app_state(db: &Database) -> AppState {
    app_state_at(db, default_now(), OverlapPolicy::Allow)
}

pub async fn create_user_with_balance(db: &Database, role: UserRole, balance: i64) -> User {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let user = User::new(
        format!("{}-{}@example.com", role, &suffix[..8]),
        format!("Test {}", role),
        role,
        balance,
        format_timestamp(default_now()),
    );
    db.create_user(&user).await.expect("Failed to create user");
    user
}

pub async fn create_employee(db: &Database, balance: i64) -> User {
    create_user_with_balance(db, UserRole::Employee, balance).await
}

pub async fn create_admin(db: &Database) -> User {
    create_user_with_balance(db, UserRole::Admin, 0).await
}
