use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

use super::{RegistryError, RegistryResult};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Append flattened JSON events for a run to `path`.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_run_logging(path: &Path, level: &str) -> RegistryResult<()> {
    let filter = run_filter(std::env::var("RUST_LOG").ok().as_deref(), level)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| RegistryError::Logging(err.to_string()))
}

fn run_filter(env_directives: Option<&str>, level: &str) -> RegistryResult<EnvFilter> {
    let directives = env_directives
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(level);
    EnvFilter::try_new(directives)
        .map_err(|err| RegistryError::Logging(format!("invalid log filter '{directives}': {err}")))
}
