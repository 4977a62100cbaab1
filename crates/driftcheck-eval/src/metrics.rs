use driftcheck_core::PsiConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{ColumnFailure, ColumnReportRow, ReportSummary};

/// Metrics contract version for drift evaluations.
pub const METRICS_VERSION: &str = "0.1";

/// Machine-readable result of a drift evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DriftMetrics {
    pub metrics_version: String,
    pub run_id: String,
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub reference: InputRef,
    pub current: InputRef,
    pub config: PsiConfig,
    pub summary: ReportSummary,
    pub rows: Vec<ColumnReportRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ColumnFailure>,
    pub performance: PerformanceMetrics,
}

/// Reference metadata for one input table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InputRef {
    pub path: String,
    pub rows: u64,
    pub columns: u64,
}

/// Performance timings for the evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceMetrics {
    pub load_ms: u64,
    pub score_ms: u64,
    pub total_ms: u64,
}
