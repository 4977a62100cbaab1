use driftcheck_core::{Column, DataTable, Error as CoreError, PsiConfig};
use driftcheck_psi::{BucketContribution, PsiBreakdown, compute_psi_breakdown};

use crate::model::{ColumnFailure, ColumnReportRow, PsiReport, StabilityTier};

/// Bucket contributions kept on each row.
const TOP_CONTRIBUTIONS: usize = 3;

/// Build ranked PSI reports from pairs of tables.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    config: PsiConfig,
}

impl ReportBuilder {
    pub fn new(config: PsiConfig) -> driftcheck_core::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PsiConfig {
        &self.config
    }

    /// Score every column present in both tables.
    ///
    /// Columns found in only one table are skipped. A column that cannot be
    /// scored becomes a failure entry and does not stop the others. Rows are
    /// sorted by PSI descending, then by name.
    pub fn build_report(&self, reference: &DataTable, current: &DataTable) -> PsiReport {
        let mut report = PsiReport::default();

        for reference_column in reference.columns() {
            let Some(current_column) = current.column(&reference_column.name) else {
                tracing::debug!(
                    event = "column_skipped",
                    column = %reference_column.name,
                    reason = "missing_in_current"
                );
                continue;
            };

            match self.score_column(reference_column, current_column) {
                Ok(row) => report.rows.push(row),
                Err(err) => {
                    tracing::warn!(
                        event = "column_failed",
                        column = %reference_column.name,
                        code = err.code(),
                        error = %err
                    );
                    report.failures.push(ColumnFailure {
                        variable: reference_column.name.clone(),
                        code: err.code().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        for name in current.column_names() {
            if reference.column(name).is_none() {
                tracing::debug!(event = "column_skipped", column = %name, reason = "missing_in_reference");
            }
        }

        report.rows.sort_by(|a, b| {
            b.psi
                .total_cmp(&a.psi)
                .then_with(|| a.variable.cmp(&b.variable))
        });
        report.failures.sort_by(|a, b| a.variable.cmp(&b.variable));
        report
    }

    fn score_column(
        &self,
        reference: &Column,
        current: &Column,
    ) -> driftcheck_core::Result<ColumnReportRow> {
        if !reference.values.has_present_values() || !current.values.has_present_values() {
            return Err(CoreError::EmptyDistribution {
                column: reference.name.clone(),
            });
        }
        if reference.kind() != current.kind() {
            return Err(CoreError::TypeMismatch {
                column: reference.name.clone(),
                reference: reference.kind(),
                current: current.kind(),
            });
        }

        let kind = reference.kind();
        let breakdown = compute_psi_breakdown(
            &reference.name,
            &reference.values,
            &current.values,
            kind,
            &self.config,
        )?;

        Ok(ColumnReportRow {
            variable: reference.name.clone(),
            kind,
            psi: round_score(breakdown.score),
            tier: StabilityTier::classify(breakdown.score),
            strategy: breakdown.strategy,
            buckets: breakdown.buckets.len(),
            top_contributions: top_contributions(breakdown),
        })
    }
}

/// Build a report with the default configuration.
pub fn build_report(reference: &DataTable, current: &DataTable) -> PsiReport {
    ReportBuilder {
        config: PsiConfig::default(),
    }
    .build_report(reference, current)
}

/// Round a score half away from zero to 4 decimal places.
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

fn top_contributions(breakdown: PsiBreakdown) -> Vec<BucketContribution> {
    let mut buckets = breakdown.buckets;
    buckets.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    buckets.truncate(TOP_CONTRIBUTIONS);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_score(0.12344), 0.1234);
        assert_eq!(round_score(0.12346), 0.1235);
        assert_eq!(round_score(0.5), 0.5);
        assert_eq!(round_score(0.00005), 0.0001);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PsiConfig {
            bucket_count: 0,
            ..PsiConfig::default()
        };
        assert!(ReportBuilder::new(config).is_err());
    }
}
