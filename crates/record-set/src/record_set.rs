//! The Record Set container.

use std::collections::HashSet;

use crate::error::RecordSetError;
use crate::value::{Column, Value};

/// One row of a record set, holding one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a row from values in column order.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Returns the values in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the value at a column position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// An ordered set of rows sharing one column layout.
///
/// ## Invariants
/// - Column names are unique and non-blank.
/// - Every row holds exactly one value per column.
/// - Row order is the order in which rows were supplied or decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl RecordSet {
    /// Assemble a record set from pre-built columns and rows.
    ///
    /// # Errors
    ///
    /// Returns [`RecordSetError`] when a column name is blank or repeated, or
    /// when a row's width differs from the column count.
    ///
    /// # Example
    ///
    /// ```
    /// use record_set::{Column, ColumnType, RecordSet, Row, Value};
    ///
    /// let records = RecordSet::new(
    ///     vec![Column::new("id", ColumnType::Integer)],
    ///     vec![Row::new(vec![Value::Integer(1)])],
    /// )
    /// .expect("valid layout");
    /// assert_eq!(records.len(), 1);
    /// ```
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self, RecordSetError> {
        validate_column_names(columns.iter().map(Column::name))?;
        for (index, row) in rows.iter().enumerate() {
            if row.values().len() != columns.len() {
                return Err(RecordSetError::RaggedRow {
                    line: u64::try_from(index).map_or(u64::MAX, |line| line.saturating_add(2)),
                    expected: columns.len(),
                    found: row.values().len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Returns the columns in header order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column names in header order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Returns the position of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name() == name)
    }

    /// Returns the rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the set has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reject blank or repeated column names.
pub(crate) fn validate_column_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), RecordSetError> {
    let mut seen = HashSet::new();
    for (index, name) in names.into_iter().enumerate() {
        if name.trim().is_empty() {
            return Err(RecordSetError::BlankColumnName { index });
        }
        if !seen.insert(name) {
            return Err(RecordSetError::DuplicateColumnName {
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ColumnType;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", ColumnType::Integer),
            Column::new("text", ColumnType::Text),
        ]
    }

    #[test]
    fn rejects_rows_with_wrong_width() {
        let err = RecordSet::new(columns(), vec![Row::new(vec![Value::Integer(1)])])
            .expect_err("ragged row should fail");
        assert_eq!(
            err,
            RecordSetError::RaggedRow {
                line: 2,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = RecordSet::new(
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("id", ColumnType::Text),
            ],
            Vec::new(),
        )
        .expect_err("duplicate names should fail");
        assert!(matches!(err, RecordSetError::DuplicateColumnName { .. }));
    }

    #[test]
    fn looks_up_columns_by_name() {
        let records = RecordSet::new(columns(), Vec::new()).expect("valid layout");
        assert_eq!(records.column_index("text"), Some(1));
        assert_eq!(records.column_index("lang"), None);
        assert!(records.is_empty());
    }
}
