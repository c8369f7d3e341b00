use crate::domain::entities::{DEFAULT_VACATION_DAYS, MAX_VACATION_DAYS};
use crate::domain::services::OverlapPolicy;
use chrono_tz::Tz;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub timezone: Tz,
    pub overlap_policy: OverlapPolicy,
    pub default_vacation_days: i64,
    pub admin_email: Option<String>,
    pub service_name: String,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://leavedesk.db?mode=rwc".to_string());

        let timezone = match lookup("TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name))?,
            None => Tz::UTC,
        };

        let overlap_policy = match lookup("OVERLAP_POLICY") {
            Some(value) => value
                .parse::<OverlapPolicy>()
                .map_err(ConfigError::InvalidOverlapPolicy)?,
            None => OverlapPolicy::default(),
        };

        let default_vacation_days = match lookup("DEFAULT_VACATION_DAYS") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| (0..=MAX_VACATION_DAYS).contains(days))
                .ok_or(ConfigError::InvalidVacationDays(value))?,
            None => DEFAULT_VACATION_DAYS,
        };

        let admin_email = lookup("ADMIN_EMAIL")
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty());

        let service_name = lookup("SERVICE_NAME").unwrap_or_else(|| "leavedesk".to_string());

        let metrics_port = match lookup("METRICS_PORT") {
            Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidPort)?),
            None => None,
        };

        Ok(Config {
            database_url,
            timezone,
            overlap_policy,
            default_vacation_days,
            admin_email,
            service_name,
            metrics_port,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("{0}")]
    InvalidOverlapPolicy(String),

    #[error("DEFAULT_VACATION_DAYS must be an integer between 0 and 365, got {0}")]
    InvalidVacationDays(String),

    #[error("Invalid port number")]
    InvalidPort,
}
