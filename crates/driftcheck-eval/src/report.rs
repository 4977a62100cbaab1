use crate::metrics::DriftMetrics;
use crate::model::{ColumnReportRow, StabilityTier};

/// Render a deterministic markdown report from drift metrics.
pub fn render_report(metrics: &DriftMetrics) -> String {
    let mut lines = Vec::new();

    lines.push("# Population Stability Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", metrics.run_id));
    lines.push(format!("- generated_at: {}", metrics.generated_at));
    lines.push(format!(
        "- reference: {} ({} rows, {} columns)",
        metrics.reference.path, metrics.reference.rows, metrics.reference.columns
    ));
    lines.push(format!(
        "- current: {} ({} rows, {} columns)",
        metrics.current.path, metrics.current.rows, metrics.current.columns
    ));
    lines.push(format!(
        "- bucket_count: {}, smoothing: {}, edge_margin: {}",
        metrics.config.bucket_count, metrics.config.smoothing, metrics.config.edge_margin
    ));
    lines.push(String::new());

    lines.push("## Columns".to_string());
    if metrics.rows.is_empty() {
        lines.push("No common columns were scored.".to_string());
    } else {
        lines.push("| variable | kind | psi | status | strategy | buckets |".to_string());
        lines.push("| --- | --- | --- | --- | --- | --- |".to_string());
        for row in &metrics.rows {
            lines.push(format!(
                "| {} | {} | {:.4} | {} | {} | {} |",
                row.variable,
                row.kind,
                row.psi,
                row.tier.label(),
                row.strategy.as_str(),
                row.buckets
            ));
        }
    }
    lines.push(String::new());

    let shifted = metrics
        .rows
        .iter()
        .filter(|row| row.tier > StabilityTier::Stable && !row.top_contributions.is_empty())
        .collect::<Vec<_>>();
    if !shifted.is_empty() {
        lines.push("## Largest bucket shifts".to_string());
        for row in shifted {
            push_contributions(&mut lines, row);
        }
        lines.push(String::new());
    }

    if !metrics.failures.is_empty() {
        lines.push("## Failed columns".to_string());
        for failure in &metrics.failures {
            lines.push(format!(
                "- {} ({}): {}",
                failure.variable, failure.code, failure.message
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(metrics));
    lines.join("\n")
}

fn push_contributions(lines: &mut Vec<String>, row: &ColumnReportRow) {
    lines.push(format!("### {}", row.variable));
    for bucket in &row.top_contributions {
        lines.push(format!(
            "- {}: reference {:.2}% -> current {:.2}% (contribution {:.4})",
            bucket.label,
            bucket.reference * 100.0,
            bucket.current * 100.0,
            bucket.contribution
        ));
    }
}

fn recommendations(metrics: &DriftMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    if metrics.summary.critical > 0 {
        lines.push(
            "- investigate critical columns before trusting scores on the current population."
                .to_string(),
        );
    }
    if metrics.summary.alert > 0 {
        lines.push("- monitor alert columns for continued shift in upcoming batches.".to_string());
    }
    if metrics
        .failures
        .iter()
        .any(|failure| failure.code == "type_mismatch")
    {
        lines.push("- align column types between reference and current datasets.".to_string());
    }
    if metrics
        .failures
        .iter()
        .any(|failure| failure.code == "empty_distribution")
    {
        lines.push("- check for columns with no values in one of the datasets.".to_string());
    }
    if lines.is_empty() {
        lines.push("- no significant shift detected.".to_string());
    }
    lines
}
