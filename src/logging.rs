//! # Structured Logging Module
//!
//! Environment-aware structured logging for bundle dispatch.
//!
//! Stdout is the response channel to the pipeline host, so every log line
//! goes to stderr.

use crate::config::{BundleConfig, LogFormat};
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging for the given configuration.
///
/// `RUST_LOG` takes precedence over the environment-derived level. Safe to
/// call more than once, and tolerant of a subscriber installed by the host.
pub fn init_structured_logging(config: &BundleConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&config.environment)));

        let result = match config.log_format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_ansi(false),
                )
                .try_init(),
        };

        if result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %config.environment,
            log_format = ?config.log_format,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log bundle dispatch operations.
#[macro_export]
macro_rules! log_bundle {
    // Full form with bundle and invocation
    ($level:ident, $operation:expr, bundle: $bundle:expr, invocation_id: $invocation_id:expr, $($key:ident: $value:expr),* $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            bundle = %$bundle,
            invocation_id = %$invocation_id,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "BUNDLE_{} ({})", $operation, $bundle
        );
    };
    // Simple form - just operation
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "BUNDLE_{}", $operation
        );
    };
    // Generic form with additional fields
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "BUNDLE_{}", $operation
        );
    };
}

/// Log namespace registry operations.
#[macro_export]
macro_rules! log_registry {
    // Full form with namespace and name
    ($level:ident, $operation:expr, namespace: $namespace:expr, name: $name:expr, $($key:ident: $value:expr),* $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            namespace = %$namespace,
            name = %$name,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{} ({}::{})", $operation, $namespace, $name
        );
    };
    // Simple form - just operation
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}
