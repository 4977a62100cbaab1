use std::path::Path;
use std::time::Instant;

use driftcheck_core::DataTable;
use uuid::Uuid;

use crate::builder::ReportBuilder;
use crate::errors::EvalError;
use crate::loader::{LoadOptions, load_table_csv};
use crate::metrics::{DriftMetrics, InputRef, METRICS_VERSION, PerformanceMetrics};
use crate::model::{EvaluateOptions, EvaluationResult};
use crate::report::render_report;

/// Compare a reference CSV against a current CSV and write drift artifacts.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    options: EvaluateOptions,
}

impl EvaluationEngine {
    pub fn new(options: EvaluateOptions) -> Self {
        Self { options }
    }

    /// Load both datasets, score every common column and write
    /// `metrics.json` and `report.md` into `out_dir`.
    pub fn run(
        &self,
        reference_path: &Path,
        current_path: &Path,
        out_dir: &Path,
    ) -> Result<EvaluationResult, EvalError> {
        let total_start = Instant::now();
        let builder = ReportBuilder::new(self.options.config)?;
        let run_id = self
            .options
            .run_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::info!(event = "evaluation_started", run_id = %run_id);

        let load_start = Instant::now();
        let load_options = LoadOptions {
            kind_overrides: self.options.kind_overrides.clone(),
        };
        let reference = load_table_csv(reference_path, &load_options)?;
        let current = load_table_csv(current_path, &load_options)?;
        let load_ms = elapsed_ms(load_start);

        let score_start = Instant::now();
        let report = builder.build_report(&reference, &current);
        let score_ms = elapsed_ms(score_start);
        let summary = report.summary();

        tracing::info!(
            event = "report_built",
            rows = report.rows.len(),
            failures = report.failures.len(),
            critical = summary.critical,
            alert = summary.alert
        );

        let threshold_columns = self
            .options
            .fail_on
            .map(|tier| (tier, report.columns_at_or_above(tier)));

        let metrics = DriftMetrics {
            metrics_version: METRICS_VERSION.to_string(),
            run_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            reference: input_ref(reference_path, &reference),
            current: input_ref(current_path, &current),
            config: *builder.config(),
            summary,
            rows: report.rows,
            failures: report.failures,
            performance: PerformanceMetrics {
                load_ms,
                score_ms,
                total_ms: elapsed_ms(total_start),
            },
        };

        let rendered = render_report(&metrics);
        std::fs::create_dir_all(out_dir)?;

        let metrics_path = out_dir.join("metrics.json");
        std::fs::write(&metrics_path, serde_json::to_vec_pretty(&metrics)?)?;

        let report_path = out_dir.join("report.md");
        std::fs::write(&report_path, rendered.as_bytes())?;

        tracing::info!(
            event = "artifacts_written",
            metrics_path = %metrics_path.display(),
            report_path = %report_path.display()
        );

        if let Some((tier, columns)) = threshold_columns {
            if !columns.is_empty() {
                return Err(EvalError::ThresholdExceeded { tier, columns });
            }
        }

        Ok(EvaluationResult {
            out_dir: out_dir.to_path_buf(),
            metrics_path,
            report_path,
            metrics,
            report: rendered,
        })
    }
}

fn input_ref(path: &Path, table: &DataTable) -> InputRef {
    InputRef {
        path: path.display().to_string(),
        rows: table.row_count() as u64,
        columns: table.columns().len() as u64,
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
