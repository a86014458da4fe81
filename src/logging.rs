//! Logging utilities for climplot.
//!
//! This module provides structured logging functionality so that every
//! rendered figure can be traced back to its inputs and timing.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Initialize the tracing subscriber with the given log level
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is harmless; later calls leave the first subscriber installed.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation failed"
        );
    }
}

/// Run a fallible operation, logging its render id, timing and outcome
pub fn log_timed_operation<F, T, E>(operation: &str, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let render_id = generate_render_id();

    debug!(
        operation = operation,
        render_id = %render_id,
        "Starting operation"
    );

    let result = f();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(_) => info!(
            operation = operation,
            render_id = %render_id,
            duration_ms = duration_ms,
            "Operation completed"
        ),
        Err(e) => error!(
            operation = operation,
            render_id = %render_id,
            duration_ms = duration_ms,
            error = %e,
            "Operation failed"
        ),
    }

    result
}

/// Log detailed information about a loaded variable
pub fn log_dataset_stats(
    source: &str,
    variable: &str,
    dims: &[String],
    shape: &[usize],
    time_steps: usize,
) {
    info!(
        operation = "data_load",
        source = source,
        variable = variable,
        dims = %dims.join(", "),
        shape = ?shape,
        time_steps = time_steps,
        "Data loaded successfully"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::ClimplotError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Generate a unique render ID
pub fn generate_render_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_render_id() {
        let id1 = generate_render_id();
        let id2 = generate_render_id();

        assert!(!id1.is_empty());
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_log_timed_operation_passes_result_through() {
        let ok: Result<i32, String> = log_timed_operation("test_operation", || Ok(42));
        assert_eq!(ok, Ok(42));

        let err: Result<i32, String> =
            log_timed_operation("test_operation", || Err("boom".to_string()));
        assert_eq!(err, Err("boom".to_string()));
    }
}
