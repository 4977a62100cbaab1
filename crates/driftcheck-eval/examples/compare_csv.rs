use std::env;
use std::path::PathBuf;

use driftcheck_eval::{EvaluateOptions, EvaluationEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut reference_path: Option<PathBuf> = None;
    let mut current_path: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--reference" => reference_path = args.next().map(PathBuf::from),
            "--current" => current_path = args.next().map(PathBuf::from),
            "--out" => out_dir = args.next().map(PathBuf::from),
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let reference_path = reference_path.ok_or("missing --reference path")?;
    let current_path = current_path.ok_or("missing --current path")?;
    let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("drift_out"));

    let engine = EvaluationEngine::new(EvaluateOptions::default());
    let result = engine.run(&reference_path, &current_path, &out_dir)?;

    for row in &result.metrics.rows {
        println!("{}\t{}\t{:.4}\t{}", row.variable, row.kind, row.psi, row.tier.label());
    }
    println!("metrics_path={}", result.metrics_path.display());
    println!("report_path={}", result.report_path.display());
    Ok(())
}
