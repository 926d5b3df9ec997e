//! PostgreSQL-backed create-or-append adapter for record sets.

use postgres::error::SqlState;
use postgres::types::ToSql;
use postgres::{Client, Statement};
use record_set::{Column, RecordSet, Value};
use tracing::{debug, warn};

use super::DatabaseConnection;
use super::sql::{bind_value, create_table_sql, insert_sql};
use crate::domain::ports::{AppendReport, RecordTableRepository, RecordTableRepositoryError};
use crate::domain::{TableName, TextEncoding};

/// Appends record sets to a PostgreSQL table, one autocommitted row at a time.
#[derive(Debug, Clone)]
pub struct PostgresRecordTableRepository {
    connection: DatabaseConnection,
    charset: Option<TextEncoding>,
}

impl PostgresRecordTableRepository {
    /// Construct a repository.
    ///
    /// `charset` overrides the text encoding otherwise read from the
    /// server's `server_encoding` setting.
    pub fn new(connection: DatabaseConnection, charset: Option<TextEncoding>) -> Self {
        Self {
            connection,
            charset,
        }
    }

    fn resolve_encoding(
        &self,
        client: &mut Client,
    ) -> Result<TextEncoding, RecordTableRepositoryError> {
        if let Some(encoding) = self.charset {
            return Ok(encoding);
        }
        let row = client
            .query_one("SHOW server_encoding", &[])
            .map_err(|error| RecordTableRepositoryError::schema(error.to_string()))?;
        let name: String = row.get(0);
        debug!(server_encoding = %name, "read destination encoding");
        Ok(TextEncoding::from_server_encoding(&name))
    }
}

impl RecordTableRepository for PostgresRecordTableRepository {
    fn append_records(
        &self,
        table: &TableName,
        records: &RecordSet,
    ) -> Result<AppendReport, RecordTableRepositoryError> {
        let mut client = self.connection.connect()?;
        let encoding = self.resolve_encoding(&mut client)?;

        client
            .batch_execute(&create_table_sql(table, records.columns()))
            .map_err(|error| RecordTableRepositoryError::schema(error.to_string()))?;
        let statement = client
            .prepare(&insert_sql(table, records.columns()))
            .map_err(|error| RecordTableRepositoryError::schema(error.to_string()))?;

        let mut writer = RowWriter {
            client: &mut client,
            statement: &statement,
            columns: records.columns(),
            report: AppendReport::default(),
        };
        for (index, row) in records.rows().iter().enumerate() {
            let (values, warning) = encoding.sanitize_row(index, records.columns(), row.values());
            let warned = warning.is_some();
            writer.report.encoding_warnings.extend(warning);
            writer.write(index, &values, warned)?;
        }
        Ok(writer.report)
    }
}

struct RowWriter<'a> {
    client: &'a mut Client,
    statement: &'a Statement,
    columns: &'a [Column],
    report: AppendReport,
}

impl RowWriter<'_> {
    fn write(
        &mut self,
        index: usize,
        values: &[Value],
        warned: bool,
    ) -> Result<(), RecordTableRepositoryError> {
        let error = match self.execute(index, values)? {
            Ok(()) => {
                self.report.rows_written += 1;
                return Ok(());
            }
            Err(error) => error,
        };
        if !is_encoding_rejection(&error) {
            return Err(RecordTableRepositoryError::query(format!(
                "row {index}: {error}"
            )));
        }

        warn!(row = index, %error, "destination rejected row text; retrying as ASCII");
        let (ascii, warning) = TextEncoding::Ascii.sanitize_row(index, self.columns, values);
        if !warned {
            self.report.encoding_warnings.extend(warning);
        }
        match self.execute(index, &ascii)? {
            Ok(()) => self.report.rows_written += 1,
            Err(retry_error) => {
                warn!(row = index, error = %retry_error, "row skipped");
                self.report.rows_skipped += 1;
            }
        }
        Ok(())
    }

    /// Outer error: the row could not be bound. Inner error: the server
    /// refused it.
    fn execute(
        &mut self,
        index: usize,
        values: &[Value],
    ) -> Result<Result<(), postgres::Error>, RecordTableRepositoryError> {
        let params = values
            .iter()
            .zip(self.statement.params())
            .map(|(value, target)| bind_value(value, target))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| RecordTableRepositoryError::query(format!("row {index}: {message}")))?;
        let refs = params
            .iter()
            .map(|param| param.as_ref() as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();
        Ok(self.client.execute(self.statement, &refs).map(|_| ()))
    }
}

fn is_encoding_rejection(error: &postgres::Error) -> bool {
    matches!(
        error.code(),
        Some(code)
            if *code == SqlState::CHARACTER_NOT_IN_REPERTOIRE
                || *code == SqlState::UNTRANSLATABLE_CHARACTER
    )
}
