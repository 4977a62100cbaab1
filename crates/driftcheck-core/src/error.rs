use thiserror::Error;

use crate::table::ColumnKind;

/// Core error type shared across driftcheck crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A sample has no present values, so relative frequencies are undefined.
    #[error("empty distribution for column '{column}'")]
    EmptyDistribution { column: String },
    /// The same column carries incompatible kinds in the two inputs.
    #[error("type mismatch for column '{column}': reference is {reference}, current is {current}")]
    TypeMismatch {
        column: String,
        reference: ColumnKind,
        current: ColumnKind,
    },
    /// Configuration values outside their valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The table violates internal invariants.
    #[error("invalid table: {0}")]
    InvalidTable(String),
}

impl Error {
    /// Stable machine-readable code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Error::EmptyDistribution { .. } => "empty_distribution",
            Error::TypeMismatch { .. } => "type_mismatch",
            Error::InvalidConfig(_) => "invalid_config",
            Error::InvalidTable(_) => "invalid_table",
        }
    }
}

/// Convenience alias for results returned by driftcheck crates.
pub type Result<T> = std::result::Result<T, Error>;
