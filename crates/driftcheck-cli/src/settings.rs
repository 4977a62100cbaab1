use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use driftcheck_core::{ColumnKind, PsiConfig};
use driftcheck_eval::StabilityTier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Optional TOML settings; command-line flags take precedence.
///
/// ```toml
/// run_dir = "runs"
/// fail_on = "critical"
/// log_level = "driftcheck_psi=debug,info"
///
/// [psi]
/// bucket_count = 10
/// smoothing = 0.0001
///
/// [columns]
/// zip_code = "categorical"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriftSettings {
    pub psi: PsiConfig,
    pub run_dir: Option<PathBuf>,
    pub fail_on: Option<StabilityTier>,
    pub log_level: Option<String>,
    pub columns: BTreeMap<String, ColumnKind>,
}

pub fn load_settings(path: &Path) -> Result<DriftSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&content).map_err(|source| SettingsError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_settings(content: &str) -> Result<DriftSettings, toml::de::Error> {
    toml::from_str(content)
}
