use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declared kind of a column, resolved once when the table is built.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed storage for one column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Number of cells, missing ones included.
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(values) => values.len(),
            ColumnValues::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present numeric values, skipping missing cells, NaN and infinities.
    ///
    /// Returns `None` for categorical storage.
    pub fn present_numbers(&self) -> Option<Vec<f64>> {
        match self {
            ColumnValues::Numeric(values) => Some(
                values
                    .iter()
                    .flatten()
                    .copied()
                    .filter(|value| value.is_finite())
                    .collect(),
            ),
            ColumnValues::Categorical(_) => None,
        }
    }

    pub fn has_present_values(&self) -> bool {
        match self {
            ColumnValues::Numeric(values) => values.iter().flatten().any(|value| value.is_finite()),
            ColumnValues::Categorical(values) => values.iter().any(Option::is_some),
        }
    }

    /// Present values rendered as category labels.
    ///
    /// Numbers use their shortest round-trip decimal form.
    pub fn present_labels(&self) -> Vec<String> {
        match self {
            ColumnValues::Numeric(_) => self
                .present_numbers()
                .unwrap_or_default()
                .into_iter()
                .map(number_label)
                .collect(),
            ColumnValues::Categorical(values) => values.iter().flatten().cloned().collect(),
        }
    }
}

/// Render a number as a category label.
pub fn number_label(value: f64) -> String {
    // Folds -0.0 into 0.0 so both land in the same category.
    format!("{}", value + 0.0)
}

/// A named column with its typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Numeric column without missing cells.
    pub fn numeric<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new(
            name,
            ColumnValues::Numeric(values.into_iter().map(Some).collect()),
        )
    }

    /// Categorical column without missing cells.
    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ColumnValues::Categorical(values.into_iter().map(|value| Some(value.into())).collect()),
        )
    }

    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }
}

/// An in-memory table of equally sized, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<Column>,
}

impl DataTable {
    /// Build a table, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut names = BTreeSet::new();
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(Error::InvalidTable(format!(
                    "duplicate column name: {}",
                    column.name
                )));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns {
                if column.values.len() != expected {
                    return Err(Error::InvalidTable(format!(
                        "column '{}' has {} row(s), expected {}",
                        column.name,
                        column.values.len(),
                        expected
                    )));
                }
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .map(|column| column.values.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_columns() {
        let result = DataTable::new(vec![
            Column::numeric("age", [1.0, 2.0]),
            Column::categorical("age", ["a", "b"]),
        ]);
        assert!(matches!(result, Err(Error::InvalidTable(_))));
    }

    #[test]
    fn rejects_ragged_columns() {
        let result = DataTable::new(vec![
            Column::numeric("age", [1.0, 2.0]),
            Column::categorical("city", ["a"]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn present_values_skip_missing_cells() {
        let values = ColumnValues::Numeric(vec![Some(1.0), None, Some(f64::NAN), Some(-0.0)]);
        assert_eq!(values.present_numbers(), Some(vec![1.0, -0.0]));
        assert_eq!(values.present_labels(), vec!["1".to_string(), "0".to_string()]);

        let values = ColumnValues::Categorical(vec![Some("x".to_string()), None]);
        assert_eq!(values.present_numbers(), None);
        assert_eq!(values.present_labels(), vec!["x".to_string()]);
    }

    #[test]
    fn infinities_are_not_present_values() {
        let values = ColumnValues::Numeric(vec![Some(2.0), Some(f64::INFINITY), Some(f64::NEG_INFINITY)]);
        assert_eq!(values.present_numbers(), Some(vec![2.0]));
        assert!(values.has_present_values());

        let values = ColumnValues::Numeric(vec![None, Some(f64::INFINITY), Some(f64::NAN)]);
        assert!(!values.has_present_values());
        assert!(!ColumnValues::Categorical(vec![None, None]).has_present_values());
    }

    #[test]
    fn looks_up_columns_by_name() {
        let table = DataTable::new(vec![
            Column::numeric("age", [1.0, 2.0]),
            Column::categorical("city", ["a", "b"]),
        ])
        .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("city").map(Column::kind), Some(ColumnKind::Categorical));
        assert!(table.column("missing").is_none());
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["age", "city"]);
    }
}
