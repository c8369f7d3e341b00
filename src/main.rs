use anyhow::Context;
use chrono::Datelike;
use leavedesk::bootstrap;
use leavedesk::config::Config;
use leavedesk::domain::ports::clock::Clock;
use leavedesk::infrastructure::observability;
use leavedesk::infrastructure::persistence::Database;
use leavedesk::infrastructure::runtime::SystemClock;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    observability::init(&config)
        .map_err(|e| anyhow::anyhow!("failed to initialize observability: {}", e))?;
    tracing::info!("Configuration loaded");

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Database connection established");

    db.run_migrations()
        .await
        .context("failed to apply migrations")?;
    tracing::info!("Database migrations applied");

    let clock = Arc::new(SystemClock::new(config.timezone));
    let today = clock.today();
    let state = bootstrap::build_app_state(db.clone(), &config, clock);

    bootstrap::initialize(&state, &config).await?;

    let reset = state.balance_service.reset_balances(today).await?;
    if reset > 0 {
        tracing::info!("Annual balance reset applied to {} users", reset);
    }

    let report = state
        .vacation_service
        .monthly_report(today.year(), today.month())
        .await?;
    tracing::info!(
        "{}-{:02}: {} submitted, {} approved, {} rejected, {} pending, {} days used",
        report.year,
        report.month,
        report.stats.submitted,
        report.stats.approved,
        report.stats.rejected,
        report.stats.pending,
        report.stats.days_used
    );

    db.close().await;
    Ok(())
}
