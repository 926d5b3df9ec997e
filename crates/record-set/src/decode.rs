//! CSV decoding into record sets.
//!
//! Decoding happens in two passes over an owned buffer: the first pass reads
//! every row and accumulates type evidence per column, the second converts
//! each cell to its column's resolved type.

use csv::{ReaderBuilder, StringRecord};

use crate::error::RecordSetError;
use crate::inference::Inferred;
use crate::record_set::{RecordSet, Row, validate_column_names};
use crate::value::{Column, ColumnType, Value};

impl RecordSet {
    /// Decode comma-separated text whose first row names the columns.
    ///
    /// # Errors
    ///
    /// Returns [`RecordSetError`] when the input is empty, the header has
    /// blank or repeated names, a row's width differs from the header, or the
    /// text is not valid UTF-8.
    ///
    /// # Example
    ///
    /// ```
    /// use record_set::{RecordSet, Value};
    ///
    /// let records = RecordSet::from_csv(b"id,lang\n7,nl\n").expect("valid export");
    /// assert_eq!(records.rows()[0].values(), &[Value::Integer(7), Value::Text("nl".to_owned())]);
    /// ```
    pub fn from_csv(bytes: &[u8]) -> Result<Self, RecordSetError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        let headers = reader.headers().map_err(map_csv_error)?.clone();
        if headers.is_empty() {
            return Err(RecordSetError::EmptyInput);
        }
        validate_column_names(headers.iter())?;

        let raw_rows = reader
            .records()
            .collect::<Result<Vec<StringRecord>, _>>()
            .map_err(map_csv_error)?;

        let mut evidence = vec![Inferred::default(); headers.len()];
        for record in &raw_rows {
            for (slot, cell) in evidence.iter_mut().zip(record.iter()) {
                *slot = slot.widen(Inferred::from_cell(cell));
            }
        }

        let columns = headers
            .iter()
            .zip(evidence)
            .map(|(name, inferred)| Column::new(name, inferred.resolve()))
            .collect::<Vec<_>>();

        let rows = raw_rows
            .iter()
            .enumerate()
            .map(|(row_index, record)| convert_record(row_index, record, &columns))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(columns, rows)
    }
}

fn convert_record(
    row_index: usize,
    record: &StringRecord,
    columns: &[Column],
) -> Result<Row, RecordSetError> {
    columns
        .iter()
        .zip(record.iter())
        .map(|(column, cell)| convert_cell(row_index, column, cell))
        .collect::<Result<Vec<_>, _>>()
        .map(Row::new)
}

fn convert_cell(row: usize, column: &Column, cell: &str) -> Result<Value, RecordSetError> {
    if cell.is_empty() {
        return Ok(Value::Null);
    }
    let conversion_error = |message: String| RecordSetError::CellConversion {
        row,
        column: column.name().to_owned(),
        message,
    };
    match column.column_type() {
        ColumnType::Integer => cell
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|error| conversion_error(error.to_string())),
        ColumnType::Float => cell
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|error| conversion_error(error.to_string())),
        ColumnType::Text => Ok(Value::Text(cell.to_owned())),
    }
}

fn map_csv_error(error: csv::Error) -> RecordSetError {
    match error.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => RecordSetError::RaggedRow {
            line: pos.as_ref().map_or(0, csv::Position::line),
            expected: usize::try_from(*expected_len).unwrap_or(usize::MAX),
            found: usize::try_from(*len).unwrap_or(usize::MAX),
        },
        csv::ErrorKind::Utf8 { pos, err } => RecordSetError::InvalidUtf8 {
            line: pos.as_ref().map_or(0, csv::Position::line),
            message: err.to_string(),
        },
        _ => RecordSetError::Malformed {
            message: error.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn decodes_typed_columns_in_header_order() {
        let csv = "id,text,lat,retweet_count\n10,hi,52.1,3\n11,there,,4\n";
        let records = RecordSet::from_csv(csv.as_bytes()).expect("valid export");

        let types = records
            .columns()
            .iter()
            .map(Column::column_type)
            .collect::<Vec<_>>();
        assert_eq!(
            types,
            [
                ColumnType::Integer,
                ColumnType::Text,
                ColumnType::Float,
                ColumnType::Integer
            ]
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records.rows()[1].get(2), Some(&Value::Null));
    }

    #[test]
    fn widens_integers_in_float_columns() {
        let records = RecordSet::from_csv(b"lng\n4\n4.9\n").expect("valid export");
        assert_eq!(records.rows()[0].get(0), Some(&Value::Float(4.0)));
    }

    #[test]
    fn keeps_original_text_in_mixed_columns() {
        let records = RecordSet::from_csv(b"source\n007\nweb\n").expect("valid export");
        assert_eq!(
            records.rows()[0].get(0),
            Some(&Value::Text("007".to_owned()))
        );
    }

    #[test]
    fn reads_quoted_fields_with_embedded_delimiters_and_newlines() {
        let csv = "id,text\n1,\"hello, \"\"world\"\"\nsecond line\"\n";
        let records = RecordSet::from_csv(csv.as_bytes()).expect("valid export");
        assert_eq!(
            records.rows()[0].get(1),
            Some(&Value::Text("hello, \"world\"\nsecond line".to_owned()))
        );
    }

    #[test]
    fn header_only_input_yields_an_empty_set() {
        let records = RecordSet::from_csv(b"id,text\n").expect("header only is valid");
        assert!(records.is_empty());
        assert_eq!(records.columns().len(), 2);
        assert_eq!(records.columns()[0].column_type(), ColumnType::Text);
    }

    #[rstest]
    #[case::empty(b"".as_slice())]
    #[case::blank_lines(b"\n\n".as_slice())]
    fn rejects_empty_input(#[case] input: &[u8]) {
        let err = RecordSet::from_csv(input).expect_err("empty input should fail");
        assert_eq!(err, RecordSetError::EmptyInput);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = RecordSet::from_csv(b"id,text\n1,a\n2\n").expect_err("ragged row should fail");
        assert!(
            matches!(
                err,
                RecordSetError::RaggedRow {
                    expected: 2,
                    found: 1,
                    ..
                }
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = RecordSet::from_csv(b"id,text\n1,\xff\xfe\n").expect_err("bad utf-8 should fail");
        assert!(matches!(err, RecordSetError::InvalidUtf8 { .. }));
    }

    #[test]
    fn rejects_blank_header_names() {
        let err = RecordSet::from_csv(b"id, \n1,2\n").expect_err("blank name should fail");
        assert_eq!(err, RecordSetError::BlankColumnName { index: 1 });
    }
}
