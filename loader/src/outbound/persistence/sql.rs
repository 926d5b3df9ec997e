//! SQL text and parameter binding for record-set appends.

use postgres::types::{ToSql, Type};
use record_set::{Column, ColumnType, Value};

use crate::domain::TableName;

/// Quote an identifier for PostgreSQL, doubling embedded quotes.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column type used when the table is created from a record set.
pub(crate) const fn column_sql_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Integer => "BIGINT",
        ColumnType::Float => "DOUBLE PRECISION",
        ColumnType::Text => "TEXT",
    }
}

/// `CREATE TABLE IF NOT EXISTS` mirroring the record set's columns.
pub(crate) fn create_table_sql(table: &TableName, columns: &[Column]) -> String {
    let definitions = columns
        .iter()
        .map(|column| {
            format!(
                "{} {}",
                quote_identifier(column.name()),
                column_sql_type(column.column_type())
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({definitions})",
        quote_identifier(table.as_str())
    )
}

/// Positional `INSERT` naming every column.
pub(crate) fn insert_sql(table: &TableName, columns: &[Column]) -> String {
    let names = columns
        .iter()
        .map(|column| quote_identifier(column.name()))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|position| format!("${position}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({names}) VALUES ({placeholders})",
        quote_identifier(table.as_str())
    )
}

/// Convert one value to the parameter type the server inferred for its
/// destination column.
///
/// Parameter types follow the existing table, which an earlier run may have
/// created with different column types than the current record set infers.
pub(crate) fn bind_value(value: &Value, target: &Type) -> Result<Box<dyn ToSql + Sync>, String> {
    match *target {
        Type::INT8 => integer(value, target).map(boxed),
        Type::INT4 => narrow::<i32>(value, target).map(boxed),
        Type::INT2 => narrow::<i16>(value, target).map(boxed),
        Type::FLOAT8 => float(value, target).map(boxed),
        Type::FLOAT4 => float(value, target).map(|bound| boxed(bound.map(|number| number as f32))),
        Type::BOOL => boolean(value, target).map(boxed),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => Ok(boxed(text(value))),
        _ => Err(format!("unsupported destination column type {target}")),
    }
}

fn boxed<T: ToSql + Sync + 'static>(value: T) -> Box<dyn ToSql + Sync> {
    Box::new(value)
}

fn mismatch(value: &Value, target: &Type) -> String {
    format!("cannot store {value:?} in a {target} column")
}

fn integer(value: &Value, target: &Type) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(_) => Ok(value.as_integer()),
        Value::Text(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| mismatch(value, target)),
        Value::Float(_) => Err(mismatch(value, target)),
    }
}

fn narrow<T: TryFrom<i64>>(value: &Value, target: &Type) -> Result<Option<T>, String> {
    integer(value, target)?
        .map(|number| T::try_from(number).map_err(|_| mismatch(value, target)))
        .transpose()
}

fn float(value: &Value, target: &Type) -> Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(_) | Value::Float(_) => Ok(value.as_float()),
        Value::Text(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| mismatch(value, target)),
    }
}

fn boolean(value: &Value, target: &Type) -> Result<Option<bool>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(0) => Ok(Some(false)),
        Value::Integer(1) => Ok(Some(true)),
        Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(Some(true)),
            "false" | "f" | "0" => Ok(Some(false)),
            _ => Err(mismatch(value, target)),
        },
        Value::Integer(_) | Value::Float(_) => Err(mismatch(value, target)),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(number) => Some(number.to_string()),
        Value::Float(number) => Some(number.to_string()),
        Value::Text(text) => Some(text.clone()),
    }
}
