//! Structured logging configuration.
//!
//! The engine crate logs through the `log` facade; the subscriber installed
//! here picks those records up alongside the server's own `tracing` events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use ko_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    // Console layer for development
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log database operation
///
/// # Arguments
///
/// * `operation` - What ran (e.g. `ensure_schema`, `health_check`)
/// * `table` - Table name, or `*` for several
/// * `duration_ms` - Duration in milliseconds
///
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64) {
    tracing::debug!(
        operation = operation,
        table = table,
        duration_ms = duration_ms,
        "Database operation"
    );

    if duration_ms > 100 {
        tracing::warn!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Slow database operation detected"
        );
    }
}

/// Log API request/response
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Request path
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
/// * `request_id` - Correlation id from the `x-request-id` header
///
pub fn log_api_request(
    method: &str,
    path: &str,
    status_code: u16,
    duration_ms: u64,
    request_id: Option<&str>,
) {
    if status_code >= 500 {
        tracing::warn!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            request_id = request_id,
            "API request failed"
        );
    } else {
        tracing::info!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            request_id = request_id,
            "API request completed"
        );
    }
}

/// Log a champion ledger event
///
/// # Arguments
///
/// * `tournament_key` - Tournament the event belongs to
/// * `event` - Event kind (e.g. `configured`, `queued`, `drained`)
/// * `message` - Event message
///
pub fn log_ledger_event(tournament_key: Option<&str>, event: &str, message: &str) {
    tracing::info!(
        tournament_key = tournament_key,
        ledger_event = event,
        "LEDGER: {}",
        message
    );
}
