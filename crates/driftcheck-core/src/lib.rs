//! Core contracts and helpers for driftcheck.
//!
//! This crate defines the typed table model, the PSI configuration and the
//! error type shared by the scoring engine, the report builder and the CLI.

pub mod config;
pub mod error;
pub mod table;

pub use config::{
    DEFAULT_BUCKET_COUNT, DEFAULT_EDGE_MARGIN, DEFAULT_SMOOTHING, PsiConfig,
};
pub use error::{Error, Result};
pub use table::{Column, ColumnKind, ColumnValues, DataTable, number_label};
