use crate::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

pub const REQUESTS_SUBMITTED: &str = "vacation_requests_submitted_total";
pub const REQUESTS_APPROVED: &str = "vacation_requests_approved_total";
pub const REQUESTS_REJECTED: &str = "vacation_requests_rejected_total";
pub const REQUESTS_CANCELLED: &str = "vacation_requests_cancelled_total";
pub const DAYS_APPROVED: &str = "vacation_days_approved_total";

pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(config)?;
    if let Some(port) = config.metrics_port {
        init_metrics(port)?;
    }
    Ok(())
}

fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_target(true);

    let default_filter = format!("{}=debug,sqlx=warn", config.service_name);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn init_metrics(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;

    metrics::describe_counter!(REQUESTS_SUBMITTED, "Vacation requests accepted as pending");
    metrics::describe_counter!(REQUESTS_APPROVED, "Vacation requests approved");
    metrics::describe_counter!(REQUESTS_REJECTED, "Vacation requests rejected");
    metrics::describe_counter!(REQUESTS_CANCELLED, "Pending vacation requests withdrawn");
    metrics::describe_counter!(DAYS_APPROVED, "Business days deducted by approvals");

    tracing::info!("Metrics exporter (Prometheus) started on port {}", port);
    Ok(())
}
