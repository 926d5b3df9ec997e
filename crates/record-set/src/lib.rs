//! In-memory tabular record sets decoded from delimited text exports.
//!
//! This crate owns the Record Set model used by the query-bin loader: an
//! ordered list of typed columns and an ordered list of rows, where each row
//! holds exactly one value per column. It is independent of HTTP and SQL
//! concerns so the loader can decode canned buffers in tests.
//!
//! # Overview
//!
//! - The header row of a delimited export defines the column names.
//! - Empty cells decode to [`Value::Null`].
//! - Each column's type is inferred from all of its non-empty cells, then
//!   every cell is converted to that type.
//!
//! # Example
//!
//! ```
//! use record_set::{ColumnType, RecordSet, Value};
//!
//! let csv = "id,text,lat\n1,hello,52.37\n2,,\n";
//! let records = RecordSet::from_csv(csv.as_bytes()).expect("valid export");
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records.column_names().collect::<Vec<_>>(), ["id", "text", "lat"]);
//! assert_eq!(records.columns()[2].column_type(), ColumnType::Float);
//! assert_eq!(records.rows()[1].get(1), Some(&Value::Null));
//! ```

mod decode;
mod error;
mod inference;
mod record_set;
mod value;

pub use error::RecordSetError;
pub use record_set::{RecordSet, Row};
pub use value::{Column, ColumnType, Value};
