use thiserror::Error;

use crate::model::StabilityTier;

/// Errors emitted by the evaluation engine.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error(transparent)]
    Core(#[from] driftcheck_core::Error),
    #[error("drift threshold exceeded: {} column(s) at or above {tier}", .columns.len())]
    ThresholdExceeded {
        tier: StabilityTier,
        columns: Vec<String>,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
