//! Drift report building and evaluation artifacts for driftcheck.
//!
//! The report builder scores every column shared by a reference and a current
//! table, classifies each score into a stability tier and ranks the result.
//! The evaluation engine wraps it with CSV loading, `metrics.json` and a
//! markdown report.

pub mod builder;
pub mod engine;
pub mod errors;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod report;
pub mod schema;

pub use builder::{ReportBuilder, build_report, round_score};
pub use engine::EvaluationEngine;
pub use errors::EvalError;
pub use loader::{LoadOptions, load_table_csv, read_table_csv};
pub use metrics::{DriftMetrics, InputRef, METRICS_VERSION, PerformanceMetrics};
pub use model::{
    ColumnFailure, ColumnReportRow, EvaluateOptions, EvaluationResult, PsiReport, ReportSummary,
    StabilityTier,
};
pub use report::render_report;
pub use schema::metrics_json_schema;
