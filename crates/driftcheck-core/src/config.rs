use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of quantile buckets attempted for numeric columns.
pub const DEFAULT_BUCKET_COUNT: usize = 10;
/// Additive constant applied to every bucket frequency.
pub const DEFAULT_SMOOTHING: f64 = 1e-4;
/// Margin used when widening the outermost numeric edges.
pub const DEFAULT_EDGE_MARGIN: f64 = 0.001;

/// Immutable scoring configuration threaded through the engine and the report builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PsiConfig {
    /// Quantile buckets attempted for numeric columns.
    pub bucket_count: usize,
    /// Strictly positive constant added to each bucket frequency.
    pub smoothing: f64,
    /// Strictly positive margin applied to the outer numeric edges.
    pub edge_margin: f64,
}

impl Default for PsiConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            smoothing: DEFAULT_SMOOTHING,
            edge_margin: DEFAULT_EDGE_MARGIN,
        }
    }
}

impl PsiConfig {
    /// Check that every option is inside its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(Error::InvalidConfig(
                "bucket_count must be at least 1".to_string(),
            ));
        }
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "smoothing must be a positive finite number, got {}",
                self.smoothing
            )));
        }
        if !self.edge_margin.is_finite() || self.edge_margin <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "edge_margin must be a positive finite number, got {}",
                self.edge_margin
            )));
        }
        Ok(())
    }
}
