use std::sync::Arc;
use std::time::Duration;

use crate::{
    main_lib::AppState,
    models::{Envelope, HealthReport},
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use quotes_core::Deadline;

const HEALTH_BUDGET: Duration = Duration::from_secs(5);

/// Service liveness, including whether the database answers.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthReport),
        (status = 503, description = "Database is unreachable", body = HealthReport)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Envelope<HealthReport>>) {
    let (code, status, database) = match state
        .quote_service
        .health_check(Deadline::after(HEALTH_BUDGET))
        .await
    {
        Ok(()) => (StatusCode::OK, "healthy", "connected"),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
        }
    };

    let report = HealthReport {
        status: status.to_string(),
        timestamp: Utc::now(),
        database: database.to_string(),
        uptime: format_uptime(state.started_at.elapsed()),
    };
    (code, Json(Envelope::data(report)))
}

/// Renders a duration as hours, minutes and seconds, e.g. `1h2m3.5s`.
///
/// Durations under a second use the largest fitting sub-second unit
/// (`ms`, `µs`, `ns`); zero is `0s`.
pub fn format_uptime(elapsed: Duration) -> String {
    let nanos = elapsed.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos, 1_000_000));
    }

    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = decimal(
        u128::from(total_secs % 60) * 1_000_000_000 + u128::from(elapsed.subsec_nanos()),
        1_000_000_000,
    );

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// `value / unit` as a decimal without trailing zeros.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
