//! Validated destination table name.

use std::fmt;

use thiserror::Error;

/// PostgreSQL truncates identifiers beyond this many bytes.
const MAX_TABLE_NAME_BYTES: usize = 63;

/// Table name used when none is configured.
pub const DEFAULT_TABLE_NAME: &str = "tweets";

/// Validation failures for [`TableName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableNameError {
    /// The name is empty once trimmed.
    #[error("table name must not be empty")]
    Empty,
    /// The name exceeds the identifier length limit.
    #[error("table name '{name}' exceeds 63 bytes")]
    TooLong { name: String },
    /// The name contains characters other than ASCII letters, digits and `_`.
    #[error("table name '{name}' may only contain ASCII letters, digits and '_'")]
    InvalidCharacter { name: String },
}

/// Destination table named for the record type.
///
/// ## Invariants
/// - Non-empty, at most 63 bytes.
/// - Only ASCII letters, digits and `_`.
///
/// # Examples
/// ```
/// use querybin_loader::domain::TableName;
///
/// let table = TableName::parse(" tweets ").expect("valid name");
/// assert_eq!(table.as_str(), "tweets");
/// assert!(TableName::parse("tweets; drop").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate a raw table name.
    pub fn parse(raw: &str) -> Result<Self, TableNameError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(TableNameError::Empty);
        }
        if name.len() > MAX_TABLE_NAME_BYTES {
            return Err(TableNameError::TooLong {
                name: name.to_owned(),
            });
        }
        if !name
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '_')
        {
            return Err(TableNameError::InvalidCharacter {
                name: name.to_owned(),
            });
        }
        Ok(Self(name.to_owned()))
    }

    /// Borrow the validated name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE_NAME.to_owned())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
