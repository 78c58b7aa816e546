//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,asmm=debug";

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// JSON for `production`, pretty for anything else.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Json,
            _ => Self::Pretty,
        }
    }

    /// Format selected by `RUST_ENV`.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var("RUST_ENV").ok().as_deref())
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. Fails if a global subscriber is
/// already installed.
pub fn init_logging() -> TelemetryResult<()> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives)
            .map_err(|e| TelemetryError::InvalidFilter(format!("{directives}: {e}")))?,
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    };

    let result = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(true))
            .try_init(),
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
