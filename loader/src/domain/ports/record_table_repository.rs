//! Driven port for appending a record set to a relational table.
//!
//! Appends are create-or-append: the table is created from the record set's
//! columns when missing, then every row is added. Nothing deduplicates, so
//! loading the same record set twice stores every row twice.

use std::collections::BTreeMap;
use std::sync::Mutex;

use record_set::{Column, RecordSet, Row};

use super::define_port_error;
use crate::domain::{RowEncodingError, TableName, TextEncoding};

/// Outcome of appending one record set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppendReport {
    /// Rows stored in the destination table.
    pub rows_written: usize,
    /// Rows the destination refused even after substitution.
    pub rows_skipped: usize,
    /// One entry per row whose text was altered to fit the destination.
    pub encoding_warnings: Vec<RowEncodingError>,
}

define_port_error! {
    /// Errors raised while writing to the destination table.
    pub enum RecordTableRepositoryError {
        /// The database could not be reached or refused the login.
        Connection { message: String } =>
            "record table connection failed: {message}",
        /// The destination table could not be created or inspected.
        Schema { message: String } =>
            "record table schema operation failed: {message}",
        /// A row write failed for a reason other than text encoding.
        Query { message: String } =>
            "record table write failed: {message}",
    }
}

/// Port for create-or-append writes of record sets.
#[cfg_attr(test, mockall::automock)]
pub trait RecordTableRepository: Send + Sync {
    /// Append every row of `records` to `table`, creating it when missing.
    fn append_records(
        &self,
        table: &TableName,
        records: &RecordSet,
    ) -> Result<AppendReport, RecordTableRepositoryError>;
}

#[derive(Debug, Default)]
struct StoredTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

/// In-process repository applying the same substitution policy as the
/// PostgreSQL adapter.
///
/// # Examples
///
/// ```
/// use querybin_loader::domain::ports::{InMemoryRecordTableRepository, RecordTableRepository};
/// use querybin_loader::domain::{TableName, TextEncoding};
/// use record_set::RecordSet;
///
/// let repository = InMemoryRecordTableRepository::new(TextEncoding::Unicode);
/// let records = RecordSet::from_csv(b"id\n1\n2\n").expect("valid export");
/// let table = TableName::default();
///
/// repository.append_records(&table, &records).expect("append");
/// repository.append_records(&table, &records).expect("append");
/// assert_eq!(repository.row_count(&table), 4);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRecordTableRepository {
    encoding: TextEncoding,
    tables: Mutex<BTreeMap<String, StoredTable>>,
}

impl InMemoryRecordTableRepository {
    /// Create an empty store that accepts text representable in `encoding`.
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            tables: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of rows stored in `table` (zero when it does not exist).
    pub fn row_count(&self, table: &TableName) -> usize {
        self.with_table(table, |stored| stored.rows.len())
            .unwrap_or_default()
    }

    /// Rows stored in `table`, in insertion order.
    pub fn rows(&self, table: &TableName) -> Vec<Row> {
        self.with_table(table, |stored| stored.rows.clone())
            .unwrap_or_default()
    }

    /// Columns `table` was created with.
    pub fn columns(&self, table: &TableName) -> Vec<Column> {
        self.with_table(table, |stored| stored.columns.clone())
            .unwrap_or_default()
    }

    fn with_table<T>(&self, table: &TableName, read: impl FnOnce(&StoredTable) -> T) -> Option<T> {
        let tables = self.tables.lock().ok()?;
        tables.get(table.as_str()).map(read)
    }
}

impl RecordTableRepository for InMemoryRecordTableRepository {
    fn append_records(
        &self,
        table: &TableName,
        records: &RecordSet,
    ) -> Result<AppendReport, RecordTableRepositoryError> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|error| RecordTableRepositoryError::connection(error.to_string()))?;
        let stored = tables
            .entry(table.as_str().to_owned())
            .or_insert_with(|| StoredTable {
                columns: records.columns().to_vec(),
                rows: Vec::new(),
            });
        if stored.columns.len() != records.columns().len() {
            return Err(RecordTableRepositoryError::query(format!(
                "table {table} has {} columns, record set has {}",
                stored.columns.len(),
                records.columns().len()
            )));
        }

        let mut report = AppendReport::default();
        for (index, row) in records.rows().iter().enumerate() {
            let (values, warning) =
                self.encoding
                    .sanitize_row(index, records.columns(), row.values());
            report.encoding_warnings.extend(warning);
            stored.rows.push(Row::new(values));
            report.rows_written += 1;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_set::Value;

    #[test]
    fn creates_the_table_from_the_first_record_set() {
        let repository = InMemoryRecordTableRepository::new(TextEncoding::Unicode);
        let records = RecordSet::from_csv(b"id,text\n1,a\n").expect("valid export");
        let table = TableName::default();

        let report = repository
            .append_records(&table, &records)
            .expect("append should succeed");

        assert_eq!(report.rows_written, 1);
        assert_eq!(repository.columns(&table), records.columns().to_vec());
    }

    #[test]
    fn substitutes_unrepresentable_text_and_keeps_the_row() {
        let repository = InMemoryRecordTableRepository::new(TextEncoding::Latin1);
        let records = RecordSet::from_csv("id,text\n1,caf\u{e9}\n2,\u{20ac}5\n".as_bytes())
            .expect("valid export");
        let table = TableName::default();

        let report = repository
            .append_records(&table, &records)
            .expect("append should succeed");

        assert_eq!(report.rows_written, 2);
        assert_eq!(report.encoding_warnings.len(), 1);
        assert_eq!(
            repository.rows(&table)[1].get(1),
            Some(&Value::Text("?5".to_owned()))
        );
    }

    #[test]
    fn rejects_record_sets_with_a_different_width() {
        let repository = InMemoryRecordTableRepository::new(TextEncoding::Unicode);
        let table = TableName::default();
        let first = RecordSet::from_csv(b"id\n1\n").expect("valid export");
        let second = RecordSet::from_csv(b"id,text\n1,a\n").expect("valid export");

        repository
            .append_records(&table, &first)
            .expect("first append should succeed");
        let error = repository
            .append_records(&table, &second)
            .expect_err("width mismatch should fail");
        assert!(matches!(error, RecordTableRepositoryError::Query { .. }));
    }
}
