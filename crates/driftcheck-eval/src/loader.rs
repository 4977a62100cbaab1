use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use driftcheck_core::{Column, ColumnKind, ColumnValues, DataTable};

use crate::errors::EvalError;

/// Options for loading a CSV into a typed table.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Forced kinds by column name.
    pub kind_overrides: BTreeMap<String, ColumnKind>,
}

/// Load a CSV file with a header row into a typed table.
pub fn load_table_csv(path: &Path, options: &LoadOptions) -> Result<DataTable, EvalError> {
    let file = std::fs::File::open(path).map_err(|err| {
        EvalError::InvalidDataset(format!("cannot open {}: {err}", path.display()))
    })?;
    let table = read_table_csv(file, options)?;
    tracing::debug!(
        event = "table_loaded",
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns().len()
    );
    Ok(table)
}

/// Read CSV data with a header row into a typed table.
///
/// Empty cells are missing values. A column is numeric when every non-empty
/// cell parses as a number, unless an override says otherwise.
pub fn read_table_csv<R: Read>(reader: R, options: &LoadOptions) -> Result<DataTable, EvalError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<_>>();

    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(EvalError::InvalidDataset(format!(
                "duplicate column header: {header}"
            )));
        }
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (idx, column) in cells.iter_mut().enumerate() {
            let value = record.get(idx).map(str::trim).unwrap_or_default();
            column.push((!value.is_empty()).then(|| value.to_string()));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| {
            let kind = options
                .kind_overrides
                .get(&name)
                .copied()
                .unwrap_or_else(|| infer_kind(&values));
            let values = typed_values(&name, kind, values)?;
            Ok(Column::new(name, values))
        })
        .collect::<Result<Vec<_>, EvalError>>()?;

    Ok(DataTable::new(columns)?)
}

fn infer_kind(values: &[Option<String>]) -> ColumnKind {
    let mut present = values.iter().flatten().peekable();
    let numeric = present.peek().is_some() && present.all(|value| value.parse::<f64>().is_ok());
    if numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

fn typed_values(
    name: &str,
    kind: ColumnKind,
    values: Vec<Option<String>>,
) -> Result<ColumnValues, EvalError> {
    match kind {
        ColumnKind::Categorical => Ok(ColumnValues::Categorical(values)),
        ColumnKind::Numeric => {
            let mut numbers = Vec::with_capacity(values.len());
            for (row_idx, value) in values.into_iter().enumerate() {
                let number = match value {
                    Some(value) => Some(value.parse::<f64>().map_err(|_| {
                        EvalError::InvalidDataset(format!(
                            "column '{name}' row {}: '{value}' is not numeric",
                            row_idx + 1
                        ))
                    })?),
                    None => None,
                };
                numbers.push(number);
            }
            Ok(ColumnValues::Numeric(numbers))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "age,segment,zip\n31,retail,01234\n,corporate,98765\n45.5,,01234\n";

    #[test]
    fn infers_kinds_from_cells() {
        let table = read_table_csv(SAMPLE.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.column("age").map(|column| column.values.clone()),
            Some(ColumnValues::Numeric(vec![Some(31.0), None, Some(45.5)]))
        );
        assert_eq!(table.column("segment").map(Column::kind), Some(ColumnKind::Categorical));
        assert_eq!(table.column("zip").map(Column::kind), Some(ColumnKind::Numeric));
    }

    #[test]
    fn overrides_force_categorical_kind() {
        let mut options = LoadOptions::default();
        options
            .kind_overrides
            .insert("zip".to_string(), ColumnKind::Categorical);
        let table = read_table_csv(SAMPLE.as_bytes(), &options).unwrap();
        let zip = table.column("zip").unwrap();
        assert_eq!(
            zip.values,
            ColumnValues::Categorical(vec![
                Some("01234".to_string()),
                Some("98765".to_string()),
                Some("01234".to_string()),
            ])
        );
    }

    #[test]
    fn forcing_numeric_on_text_fails() {
        let mut options = LoadOptions::default();
        options
            .kind_overrides
            .insert("segment".to_string(), ColumnKind::Numeric);
        let err = read_table_csv(SAMPLE.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, EvalError::InvalidDataset(message) if message.contains("segment")));
    }

    #[test]
    fn all_empty_column_is_categorical() {
        let table = read_table_csv("id,note\n1,\n2,\n".as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(table.column("note").map(Column::kind), Some(ColumnKind::Categorical));
        assert_eq!(table.column("id").map(Column::kind), Some(ColumnKind::Numeric));
    }

    #[test]
    fn rejects_duplicate_headers() {
        let err = read_table_csv("a,a\n1,2\n".as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, EvalError::InvalidDataset(_)));
    }
}
