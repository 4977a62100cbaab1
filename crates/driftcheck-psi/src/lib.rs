//! Column PSI engine for driftcheck.
//!
//! Bucket sets are derived from the reference sample only and applied to both
//! samples. Numeric columns use quantile edges; categorical columns (and
//! numeric columns too degenerate to cut) use union-aligned value counts.

pub mod binning;
pub mod engine;
pub mod frequency;

pub use binning::{BinningStrategy, BucketEdges, QuantileOutcome, StrategyKind, extend_edges};
pub use engine::{BucketContribution, PsiBreakdown, compute_psi, compute_psi_breakdown, psi_score};
pub use frequency::AlignedFrequencies;
