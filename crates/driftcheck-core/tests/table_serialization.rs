use driftcheck_core::{Column, ColumnKind, ColumnValues, DataTable, PsiConfig};

#[test]
fn serializes_table_deterministically() {
    let table = DataTable::new(vec![
        Column::new("income", ColumnValues::Numeric(vec![Some(1.5), None])),
        Column::categorical("segment", ["retail", "corporate"]),
    ])
    .expect("build table");

    let json = serde_json::to_string_pretty(&table).expect("serialize table");
    let expected = r#"{
  "columns": [
    {
      "name": "income",
      "values": {
        "kind": "numeric",
        "values": [
          1.5,
          null
        ]
      }
    },
    {
      "name": "segment",
      "values": {
        "kind": "categorical",
        "values": [
          "retail",
          "corporate"
        ]
      }
    }
  ]
}"#;
    assert_eq!(json, expected);

    let parsed: DataTable = serde_json::from_str(&json).expect("parse table");
    assert_eq!(parsed, table);
    assert_eq!(
        parsed.column("income").map(Column::kind),
        Some(ColumnKind::Numeric)
    );
}

#[test]
fn config_fills_missing_fields_with_defaults() {
    let config: PsiConfig = serde_json::from_str(r#"{ "bucket_count": 5 }"#).expect("parse config");
    assert_eq!(config.bucket_count, 5);
    assert_eq!(config.smoothing, 1e-4);
    assert_eq!(config.edge_margin, 0.001);
}
