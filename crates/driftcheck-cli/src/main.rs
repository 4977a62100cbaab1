mod registry;
mod settings;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use driftcheck_core::{ColumnKind, PsiConfig};
use driftcheck_eval::{EvalError, EvaluateOptions, EvaluationEngine, StabilityTier};
use registry::{DEFAULT_LOG_LEVEL, RunContext, RunOptions, init_run_logging, start_run};
use settings::{DriftSettings, SettingsError, load_settings};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "driftcheck", version, about = "Population Stability Index drift reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare a current dataset against a reference dataset.
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Reference (training) CSV file.
    #[arg(long, value_name = "CSV")]
    reference: PathBuf,
    /// Current (scoring) CSV file.
    #[arg(long, value_name = "CSV")]
    current: PathBuf,
    /// Optional TOML settings file.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,
    /// Quantile buckets for numeric columns.
    #[arg(long)]
    bucket_count: Option<usize>,
    /// Constant added to every bucket frequency.
    #[arg(long)]
    smoothing: Option<f64>,
    /// Margin applied when widening the outer numeric edges.
    #[arg(long)]
    edge_margin: Option<f64>,
    /// Treat the named column as categorical.
    #[arg(long, value_name = "COLUMN")]
    categorical: Vec<String>,
    /// Treat the named column as numeric.
    #[arg(long, value_name = "COLUMN")]
    numeric: Vec<String>,
    /// Output directory for runs.
    #[arg(long)]
    run_dir: Option<PathBuf>,
    /// Exit with an error when any column reaches this tier.
    #[arg(long, value_enum)]
    fail_on: Option<FailOn>,
    /// Log filter for the run log, e.g. `debug` or `driftcheck_psi=debug,info`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FailOn {
    Alert,
    Critical,
}

impl From<FailOn> for StabilityTier {
    fn from(value: FailOn) -> Self {
        match value {
            FailOn::Alert => StabilityTier::Alert,
            FailOn::Critical => StabilityTier::Critical,
        }
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compare(args) => run_compare(args),
    }
}

fn run_compare(args: CompareArgs) -> Result<(), CliError> {
    let settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => DriftSettings::default(),
    };
    let log_level = args
        .log_level
        .clone()
        .or_else(|| settings.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let (run_dir, options) = resolve_options(&args, settings)?;

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir,
        options,
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path, &log_level)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        reference = %run_ctx.options.reference.display(),
        current = %run_ctx.options.current.display()
    );

    let timer = Instant::now();
    let engine = EvaluationEngine::new(EvaluateOptions {
        config: run_ctx.options.config,
        kind_overrides: run_ctx.options.kind_overrides.clone(),
        fail_on: run_ctx.options.fail_on,
        run_id: Some(run_id),
    });

    let result = engine.run(
        &run_ctx.options.reference,
        &run_ctx.options.current,
        &run_paths.root,
    );
    let duration_ms = timer.elapsed().as_millis();

    match result {
        Ok(result) => {
            tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);
            println!("run_dir={}", run_paths.root.display());
            println!("metrics_path={}", result.metrics_path.display());
            println!("report_path={}", result.report_path.display());
            Ok(())
        }
        Err(err) => {
            tracing::error!(
                event = "run_finished",
                status = "failed",
                duration_ms = duration_ms,
                error = %err
            );
            println!("run_dir={}", run_paths.root.display());
            Err(err.into())
        }
    }
}

/// Merge settings and flags; flags win.
fn resolve_options(
    args: &CompareArgs,
    settings: DriftSettings,
) -> Result<(PathBuf, RunOptions), CliError> {
    let config = PsiConfig {
        bucket_count: args.bucket_count.unwrap_or(settings.psi.bucket_count),
        smoothing: args.smoothing.unwrap_or(settings.psi.smoothing),
        edge_margin: args.edge_margin.unwrap_or(settings.psi.edge_margin),
    };
    config
        .validate()
        .map_err(|err| CliError::InvalidConfig(err.to_string()))?;

    let mut kind_overrides: BTreeMap<String, ColumnKind> = settings.columns;
    for column in &args.categorical {
        if args.numeric.contains(column) {
            return Err(CliError::InvalidConfig(format!(
                "column '{column}' cannot be both --categorical and --numeric"
            )));
        }
        kind_overrides.insert(column.clone(), ColumnKind::Categorical);
    }
    for column in &args.numeric {
        kind_overrides.insert(column.clone(), ColumnKind::Numeric);
    }

    let run_dir = args
        .run_dir
        .clone()
        .or(settings.run_dir)
        .unwrap_or_else(|| PathBuf::from("runs"));

    let options = RunOptions {
        reference: args.reference.clone(),
        current: args.current.clone(),
        config,
        kind_overrides,
        fail_on: args.fail_on.map(StabilityTier::from).or(settings.fail_on),
    };
    Ok((run_dir, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare_args(extra: &[&str]) -> CompareArgs {
        let mut argv = vec![
            "driftcheck",
            "compare",
            "--reference",
            "train.csv",
            "--current",
            "score.csv",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).expect("parse args").command {
            Command::Compare(args) => args,
        }
    }

    #[test]
    fn flags_override_settings() {
        let mut settings = DriftSettings::default();
        settings.psi.bucket_count = 5;
        settings.fail_on = Some(StabilityTier::Alert);
        settings
            .columns
            .insert("zip".to_string(), ColumnKind::Numeric);

        let args = compare_args(&[
            "--bucket-count",
            "20",
            "--categorical",
            "zip",
            "--fail-on",
            "critical",
        ]);
        let (run_dir, options) = resolve_options(&args, settings).expect("resolve");

        assert_eq!(run_dir, PathBuf::from("runs"));
        assert_eq!(options.config.bucket_count, 20);
        assert_eq!(options.config.smoothing, 1e-4);
        assert_eq!(options.fail_on, Some(StabilityTier::Critical));
        assert_eq!(
            options.kind_overrides.get("zip"),
            Some(&ColumnKind::Categorical)
        );
    }

    #[test]
    fn settings_apply_without_flags() {
        let mut settings = DriftSettings::default();
        settings.run_dir = Some(PathBuf::from("drift_runs"));
        settings.fail_on = Some(StabilityTier::Alert);

        let (run_dir, options) = resolve_options(&compare_args(&[]), settings).expect("resolve");
        assert_eq!(run_dir, PathBuf::from("drift_runs"));
        assert_eq!(options.fail_on, Some(StabilityTier::Alert));
        assert_eq!(options.config, PsiConfig::default());
    }

    #[test]
    fn rejects_conflicting_overrides() {
        let args = compare_args(&["--categorical", "a", "--numeric", "a"]);
        let err = resolve_options(&args, DriftSettings::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_invalid_smoothing() {
        let args = compare_args(&["--smoothing", "0"]);
        assert!(resolve_options(&args, DriftSettings::default()).is_err());
    }
}
