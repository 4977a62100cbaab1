use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use driftcheck_core::{ColumnKind, PsiConfig};
use driftcheck_psi::{BucketContribution, StrategyKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::DriftMetrics;

/// Score at which a column moves from stable to alert.
pub const ALERT_THRESHOLD: f64 = 0.10;
/// Score at which a column moves from alert to critical.
pub const CRITICAL_THRESHOLD: f64 = 0.25;

/// Stability tier for a PSI score. Ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StabilityTier {
    Stable,
    Alert,
    Critical,
}

impl StabilityTier {
    /// Classify a raw (unrounded) score using the fixed thresholds.
    pub fn classify(score: f64) -> Self {
        if score < ALERT_THRESHOLD {
            StabilityTier::Stable
        } else if score < CRITICAL_THRESHOLD {
            StabilityTier::Alert
        } else {
            StabilityTier::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StabilityTier::Stable => "stable",
            StabilityTier::Alert => "alert",
            StabilityTier::Critical => "critical",
        }
    }

    /// Human-readable label used in rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            StabilityTier::Stable => "Stable",
            StabilityTier::Alert => "Alert (moderate shift)",
            StabilityTier::Critical => "Critical (significant shift)",
        }
    }
}

impl fmt::Display for StabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scored result for one common column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnReportRow {
    pub variable: String,
    pub kind: ColumnKind,
    /// PSI rounded half away from zero to 4 decimals.
    pub psi: f64,
    pub tier: StabilityTier,
    /// Strategy actually used, `frequency` when a numeric column fell back.
    pub strategy: StrategyKind,
    pub buckets: usize,
    /// Largest per-bucket contributions, highest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_contributions: Vec<BucketContribution>,
}

/// A common column that could not be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnFailure {
    pub variable: String,
    pub code: String,
    pub message: String,
}

/// Counts per tier for a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub columns_compared: usize,
    pub stable: usize,
    pub alert: usize,
    pub critical: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_tier: Option<StabilityTier>,
}

/// Ranked rows plus per-column failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PsiReport {
    pub rows: Vec<ColumnReportRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ColumnFailure>,
}

impl PsiReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.failures.is_empty()
    }

    pub fn row(&self, variable: &str) -> Option<&ColumnReportRow> {
        self.rows.iter().find(|row| row.variable == variable)
    }

    pub fn highest_tier(&self) -> Option<StabilityTier> {
        self.rows.iter().map(|row| row.tier).max()
    }

    /// Variables whose tier is at least `tier`, in report order.
    pub fn columns_at_or_above(&self, tier: StabilityTier) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.tier >= tier)
            .map(|row| row.variable.clone())
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            columns_compared: self.rows.len() + self.failures.len(),
            failed: self.failures.len(),
            highest_tier: self.highest_tier(),
            ..ReportSummary::default()
        };
        for row in &self.rows {
            match row.tier {
                StabilityTier::Stable => summary.stable += 1,
                StabilityTier::Alert => summary.alert += 1,
                StabilityTier::Critical => summary.critical += 1,
            }
        }
        summary
    }
}

/// Options for a CSV-to-CSV drift evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluateOptions {
    /// Scoring configuration shared by every column.
    #[serde(default)]
    pub config: PsiConfig,
    /// Forced kinds by column name; other columns are inferred at load time.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kind_overrides: BTreeMap<String, ColumnKind>,
    /// Fail after writing artifacts when any column reaches this tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<StabilityTier>,
    /// Run identifier written into metrics; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

/// Result of an evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub out_dir: PathBuf,
    pub metrics_path: PathBuf,
    pub report_path: PathBuf,
    pub metrics: DriftMetrics,
    pub report: String,
}
