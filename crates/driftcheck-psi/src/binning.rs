use driftcheck_core::{ColumnKind, PsiConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a column is discretized before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinningStrategy {
    /// Equal-population intervals cut from the reference sample.
    Quantile { bucket_count: usize },
    /// One bucket per distinct value seen in either sample.
    Frequency,
}

/// Strategy label carried into reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Quantile,
    Frequency,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Quantile => "quantile",
            StrategyKind::Frequency => "frequency",
        }
    }
}

impl BinningStrategy {
    /// Initial strategy for a declared column kind.
    pub fn for_kind(kind: ColumnKind, config: &PsiConfig) -> Self {
        match kind {
            ColumnKind::Numeric => BinningStrategy::Quantile {
                bucket_count: config.bucket_count,
            },
            ColumnKind::Categorical => BinningStrategy::Frequency,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            BinningStrategy::Quantile { .. } => StrategyKind::Quantile,
            BinningStrategy::Frequency => StrategyKind::Frequency,
        }
    }
}

/// Result of cutting a reference sample into quantile buckets.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantileOutcome {
    Edges(BucketEdges),
    /// Fewer than two distinct edges; the caller must switch to `Frequency`.
    FallbackRequired,
}

/// Strictly increasing bucket boundaries.
///
/// Buckets are right-closed `(e[i], e[i+1]]`, except the first which also
/// includes its lower edge.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketEdges {
    edges: Vec<f64>,
}

impl BucketEdges {
    /// Build from ascending edges, dropping duplicates.
    ///
    /// Returns `None` when fewer than two distinct finite edges remain.
    pub fn from_sorted(mut edges: Vec<f64>) -> Option<Self> {
        edges.retain(|edge| edge.is_finite());
        edges.dedup();
        if edges.len() < 2 || edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return None;
        }
        Some(Self { edges })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.edges
    }

    pub fn lower(&self) -> f64 {
        self.edges[0]
    }

    pub fn upper(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn bucket_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// Index of the bucket holding `value`, if any.
    pub fn bucket_of(&self, value: f64) -> Option<usize> {
        let below = self.edges.partition_point(|edge| *edge < value);
        if below == 0 {
            return (value == self.lower()).then_some(0);
        }
        if below == self.edges.len() {
            return None;
        }
        Some(below - 1)
    }

    /// Count values per bucket. Values outside every bucket are skipped.
    pub fn histogram(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.bucket_count()];
        let mut uncovered = 0usize;
        for value in values {
            match self.bucket_of(*value) {
                Some(idx) => counts[idx] += 1,
                None => uncovered += 1,
            }
        }
        if uncovered > 0 {
            tracing::warn!(event = "values_outside_edges", uncovered = uncovered);
        }
        counts
    }

    /// Interval labels in ascending order.
    pub fn labels(&self) -> Vec<String> {
        self.edges
            .windows(2)
            .enumerate()
            .map(|(idx, pair)| {
                let open = if idx == 0 { '[' } else { '(' };
                format!("{open}{:.4}, {:.4}]", pair[0], pair[1])
            })
            .collect()
    }
}

/// Cut a sorted reference sample into `bucket_count` quantile buckets.
///
/// Quantiles interpolate linearly between order statistics at probabilities
/// `0, 1/q, ..., 1`. Repeated edges collapse into one.
pub fn quantile_edges(sorted: &[f64], bucket_count: usize) -> QuantileOutcome {
    if sorted.is_empty() || bucket_count == 0 {
        return QuantileOutcome::FallbackRequired;
    }

    let edges = (0..=bucket_count)
        .map(|step| quantile(sorted, step as f64 / bucket_count as f64))
        .collect::<Vec<_>>();

    match BucketEdges::from_sorted(edges) {
        Some(edges) => QuantileOutcome::Edges(edges),
        None => QuantileOutcome::FallbackRequired,
    }
}

fn quantile(sorted: &[f64], probability: f64) -> f64 {
    let last = sorted.len() - 1;
    let position = last as f64 * probability;
    let lo = (position.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let fraction = position - lo as f64;
    if fraction == 0.0 || lo == hi {
        return sorted[lo];
    }
    sorted[lo] + fraction * (sorted[hi] - sorted[lo])
}

/// Widen the outermost edges so values in `[observed_min, observed_max]` fall inside.
pub fn extend_edges(
    edges: &BucketEdges,
    observed_min: f64,
    observed_max: f64,
    margin: f64,
) -> BucketEdges {
    let mut extended = edges.edges.clone();
    let last = extended.len() - 1;
    extended[0] = edges.lower().min(observed_min) - margin;
    extended[last] = edges.upper().max(observed_max) + margin;
    BucketEdges { edges: extended }
}
