use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::metrics::DriftMetrics;

/// Emit the JSON Schema for `metrics.json`.
pub fn metrics_json_schema() -> RootSchema {
    schema_for!(DriftMetrics)
}
