//! Market-making error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MmError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Risk error: {0}")]
    Risk(#[from] asmm_risk::RiskError),
}

pub type MmResult<T> = Result<T, MmError>;
