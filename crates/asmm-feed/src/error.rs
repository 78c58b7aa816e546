//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Timestamps not strictly increasing at index {index}: {prev} -> {next}")]
    NonMonotonic { index: usize, prev: i64, next: i64 },

    #[error("Core error: {0}")]
    Core(#[from] asmm_core::CoreError),
}

pub type FeedResult<T> = Result<T, FeedError>;
