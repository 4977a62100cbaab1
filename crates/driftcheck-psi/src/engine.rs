use driftcheck_core::{ColumnKind, ColumnValues, Error, PsiConfig, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::binning::{BinningStrategy, QuantileOutcome, StrategyKind, extend_edges, quantile_edges};
use crate::frequency::AlignedFrequencies;

/// One bucket's masses (before smoothing) and its share of the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BucketContribution {
    pub label: String,
    pub reference: f64,
    pub current: f64,
    pub contribution: f64,
}

/// PSI score with the bucket-level detail it was summed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PsiBreakdown {
    pub score: f64,
    pub strategy: StrategyKind,
    pub buckets: Vec<BucketContribution>,
}

/// Compute the PSI of `current` against `reference` for one column.
///
/// `column` only names the column in errors.
pub fn compute_psi(
    column: &str,
    reference: &ColumnValues,
    current: &ColumnValues,
    kind: ColumnKind,
    config: &PsiConfig,
) -> Result<f64> {
    compute_psi_breakdown(column, reference, current, kind, config).map(|breakdown| breakdown.score)
}

/// Compute the PSI together with per-bucket contributions.
pub fn compute_psi_breakdown(
    column: &str,
    reference: &ColumnValues,
    current: &ColumnValues,
    kind: ColumnKind,
    config: &PsiConfig,
) -> Result<PsiBreakdown> {
    config.validate()?;

    if reference.kind() != current.kind() {
        return Err(Error::TypeMismatch {
            column: column.to_string(),
            reference: reference.kind(),
            current: current.kind(),
        });
    }
    if kind == ColumnKind::Numeric && reference.kind() == ColumnKind::Categorical {
        return Err(Error::InvalidTable(format!(
            "column '{column}' is declared numeric but stores categorical values"
        )));
    }

    let strategy = BinningStrategy::for_kind(kind, config);
    let (strategy, aligned) = match strategy {
        BinningStrategy::Quantile { bucket_count } => {
            let reference = present_numbers(column, reference)?;
            let current = present_numbers(column, current)?;
            match quantile_frequencies(&reference, &current, bucket_count, config.edge_margin) {
                Some(aligned) => (strategy, aligned),
                None => {
                    tracing::debug!(
                        event = "quantile_fallback",
                        column = %column,
                        reference_len = reference.len()
                    );
                    let aligned = category_frequencies(
                        column,
                        number_labels(&reference),
                        number_labels(&current),
                    )?;
                    (BinningStrategy::Frequency, aligned)
                }
            }
        }
        BinningStrategy::Frequency => (
            strategy,
            category_frequencies(column, reference.present_labels(), current.present_labels())?,
        ),
    };

    let buckets = contributions(aligned, config.smoothing);
    let score: f64 = buckets.iter().map(|bucket| bucket.contribution).sum();

    tracing::debug!(
        event = "column_scored",
        column = %column,
        strategy = strategy.kind().as_str(),
        buckets = buckets.len(),
        score = score
    );

    Ok(PsiBreakdown {
        score,
        strategy: strategy.kind(),
        buckets,
    })
}

/// Sum `(cur - ref) * ln(cur / ref)` over aligned masses after smoothing.
pub fn psi_score(reference: &[f64], current: &[f64], smoothing: f64) -> f64 {
    reference
        .iter()
        .zip(current)
        .map(|(reference, current)| term(*reference, *current, smoothing))
        .sum()
}

fn term(reference: f64, current: f64, smoothing: f64) -> f64 {
    let reference = reference + smoothing;
    let current = current + smoothing;
    (current - reference) * (current / reference).ln()
}

fn contributions(aligned: AlignedFrequencies, smoothing: f64) -> Vec<BucketContribution> {
    aligned
        .labels
        .into_iter()
        .zip(aligned.reference)
        .zip(aligned.current)
        .map(|((label, reference), current)| BucketContribution {
            label,
            reference,
            current,
            contribution: term(reference, current, smoothing),
        })
        .collect()
}

fn present_numbers(column: &str, values: &ColumnValues) -> Result<Vec<f64>> {
    let numbers = values.present_numbers().unwrap_or_default();
    if numbers.is_empty() {
        return Err(Error::EmptyDistribution {
            column: column.to_string(),
        });
    }
    Ok(numbers)
}

fn number_labels(values: &[f64]) -> Vec<String> {
    values
        .iter()
        .copied()
        .map(driftcheck_core::number_label)
        .collect()
}

fn quantile_frequencies(
    reference: &[f64],
    current: &[f64],
    bucket_count: usize,
    margin: f64,
) -> Option<AlignedFrequencies> {
    let mut sorted = reference.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let edges = match quantile_edges(&sorted, bucket_count) {
        QuantileOutcome::Edges(edges) => edges,
        QuantileOutcome::FallbackRequired => return None,
    };

    let (current_min, current_max) = current
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(*value), max.max(*value))
        });
    let edges = extend_edges(&edges, current_min, current_max, margin);

    let reference_counts = edges.histogram(reference);
    let current_counts = edges.histogram(current);
    Some(AlignedFrequencies::from_histograms(
        edges.labels(),
        &reference_counts,
        reference.len(),
        &current_counts,
        current.len(),
    ))
}

fn category_frequencies(
    column: &str,
    reference: Vec<String>,
    current: Vec<String>,
) -> Result<AlignedFrequencies> {
    if reference.is_empty() || current.is_empty() {
        return Err(Error::EmptyDistribution {
            column: column.to_string(),
        });
    }
    Ok(AlignedFrequencies::from_categories(&reference, &current))
}
