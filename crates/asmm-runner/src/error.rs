//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] asmm_feed::FeedError),

    #[error("Executor error: {0}")]
    Executor(#[from] asmm_executor::ExecutorError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] asmm_mm::MmError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] asmm_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
