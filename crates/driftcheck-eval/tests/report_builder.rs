use driftcheck_core::{Column, ColumnKind, ColumnValues, DataTable, PsiConfig};
use driftcheck_eval::{LoadOptions, ReportBuilder, StabilityTier, build_report, read_table_csv, round_score};
use driftcheck_psi::{StrategyKind, compute_psi};

fn table(columns: Vec<Column>) -> DataTable {
    DataTable::new(columns).expect("build table")
}

fn uniform(name: &str, len: usize, offset: f64, step: f64) -> Column {
    Column::numeric(name, (0..len).map(|i| offset + i as f64 * step))
}

#[test]
fn uniform_columns_are_stable() {
    let reference = table(vec![uniform("score", 1000, 0.0, 0.1)]);
    let current = table(vec![uniform("score", 1000, 0.05, 0.1)]);

    let report = build_report(&reference, &current);
    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.variable, "score");
    assert_eq!(row.kind, ColumnKind::Numeric);
    assert_eq!(row.strategy, StrategyKind::Quantile);
    assert!(row.psi < 0.02, "psi {}", row.psi);
    assert_eq!(row.tier, StabilityTier::Stable);
}

#[test]
fn shifted_columns_are_critical() {
    let reference = table(vec![uniform("score", 500, 0.0, 0.1)]);
    let current = table(vec![uniform("score", 500, 50.0, 0.1)]);

    let report = build_report(&reference, &current);
    let row = report.row("score").expect("score row");
    assert!(row.psi > 0.25, "psi {}", row.psi);
    assert_eq!(row.tier, StabilityTier::Critical);
    assert!(!row.top_contributions.is_empty());
    assert!(row.top_contributions.len() <= 3);
}

#[test]
fn only_common_columns_are_reported() {
    let reference = table(vec![
        uniform("A", 10, 0.0, 1.0),
        Column::categorical("B", ["x", "y", "x", "y", "x", "y", "x", "y", "x", "y"]),
    ]);
    let current = table(vec![
        Column::categorical("B", ["x", "x", "y"]),
        uniform("C", 3, 0.0, 1.0),
    ]);

    let report = build_report(&reference, &current);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].variable, "B");
    assert_eq!(report.rows[0].kind, ColumnKind::Categorical);
    assert!(report.failures.is_empty());
}

#[test]
fn no_common_columns_yield_empty_report() {
    let reference = table(vec![uniform("A", 5, 0.0, 1.0)]);
    let current = table(vec![uniform("B", 5, 0.0, 1.0)]);
    let report = build_report(&reference, &current);
    assert!(report.is_empty());
    assert_eq!(report.summary().columns_compared, 0);
    assert_eq!(report.highest_tier(), None);
}

#[test]
fn column_failures_do_not_stop_other_columns() {
    let reference = table(vec![
        uniform("amount", 4, 0.0, 1.0),
        uniform("code", 4, 0.0, 1.0),
        Column::new("empty", ColumnValues::Numeric(vec![None; 4])),
    ]);
    let current = table(vec![
        uniform("amount", 4, 0.0, 1.0),
        Column::categorical("code", ["a", "b", "c", "d"]),
        uniform("empty", 4, 0.0, 1.0),
    ]);

    let report = build_report(&reference, &current);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].variable, "amount");

    let codes = report
        .failures
        .iter()
        .map(|failure| (failure.variable.as_str(), failure.code.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        codes,
        vec![("code", "type_mismatch"), ("empty", "empty_distribution")]
    );
    assert!(report.failures[0].message.contains("code"));

    let summary = report.summary();
    assert_eq!(summary.columns_compared, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.stable, 1);
}

#[test]
fn blank_column_reports_empty_distribution_not_mismatch() {
    let reference = read_table_csv("id,note\n1,\n2,\n3,\n".as_bytes(), &LoadOptions::default())
        .expect("load reference");
    let current = read_table_csv("id,note\n1,4.5\n2,7\n3,1\n".as_bytes(), &LoadOptions::default())
        .expect("load current");

    let report = build_report(&reference, &current);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].variable, "note");
    assert_eq!(report.failures[0].code, "empty_distribution");
    assert!(report.row("id").is_some());
}

#[test]
fn rows_sort_by_score_then_name() {
    let reference = table(vec![
        Column::categorical("b_same", ["x", "y"]),
        Column::categorical("a_same", ["x", "y"]),
        Column::categorical("shifted", ["x", "x"]),
    ]);
    let current = table(vec![
        Column::categorical("b_same", ["x", "y"]),
        Column::categorical("a_same", ["x", "y"]),
        Column::categorical("shifted", ["y", "y"]),
    ]);

    let report = build_report(&reference, &current);
    let order = report
        .rows
        .iter()
        .map(|row| row.variable.as_str())
        .collect::<Vec<_>>();
    assert_eq!(order, vec!["shifted", "a_same", "b_same"]);
}

#[test]
fn reported_score_is_rounded_raw_score() {
    let reference = Column::categorical("segment", ["a", "a", "b", "c"]);
    let current = Column::categorical("segment", ["a", "b", "b", "b", "c"]);
    let config = PsiConfig::default();
    let raw = compute_psi(
        "segment",
        &reference.values,
        &current.values,
        ColumnKind::Categorical,
        &config,
    )
    .expect("psi");

    let builder = ReportBuilder::new(config).expect("builder");
    let report = builder.build_report(&table(vec![reference]), &table(vec![current]));
    assert_eq!(report.rows[0].psi, round_score(raw));
    assert_eq!(report.rows[0].tier, StabilityTier::classify(raw));
}

#[test]
fn degenerate_numeric_columns_fall_back() {
    let reference = table(vec![Column::numeric("flag", vec![0.0; 20])]);
    let current = table(vec![Column::numeric(
        "flag",
        (0..20).map(|i| if i % 2 == 0 { 0.0 } else { 1.0 }),
    )]);

    let report = build_report(&reference, &current);
    let row = report.row("flag").expect("flag row");
    assert_eq!(row.kind, ColumnKind::Numeric);
    assert_eq!(row.strategy, StrategyKind::Frequency);
    assert_eq!(row.buckets, 2);
    assert!(row.psi.is_finite());
    assert_eq!(row.tier, StabilityTier::Critical);
}
