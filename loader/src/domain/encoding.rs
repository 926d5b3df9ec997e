//! Destination text encodings and the per-row substitution policy.
//!
//! A row whose text cannot be stored in the destination encoding is not
//! rejected: every unrepresentable character is replaced with `?`, one
//! [`RowEncodingError`] is reported for the row, and the row is written.

use std::borrow::Cow;
use std::fmt;

use record_set::{Column, Value};
use thiserror::Error;

const REPLACEMENT: char = '?';

/// Character repertoire accepted by the destination's text columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Any Unicode scalar value (`utf8mb4`, PostgreSQL `UTF8`).
    #[default]
    Unicode,
    /// Basic Multilingual Plane only: at most three UTF-8 bytes (`utf8mb3`).
    BasicMultilingualPlane,
    /// ISO-8859-1.
    Latin1,
    /// 7-bit ASCII.
    Ascii,
}

impl TextEncoding {
    /// Parse a configured charset label.
    ///
    /// # Examples
    /// ```
    /// use querybin_loader::domain::TextEncoding;
    ///
    /// assert_eq!(
    ///     TextEncoding::from_charset("utf8mb3"),
    ///     Some(TextEncoding::BasicMultilingualPlane)
    /// );
    /// assert_eq!(TextEncoding::from_charset("ebcdic"), None);
    /// ```
    pub fn from_charset(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf8mb4" | "utf8" | "utf-8" => Some(Self::Unicode),
            "utf8mb3" => Some(Self::BasicMultilingualPlane),
            "latin1" | "iso-8859-1" | "iso_8859_1" => Some(Self::Latin1),
            "ascii" | "us-ascii" => Some(Self::Ascii),
            _ => None,
        }
    }

    /// Map a PostgreSQL `server_encoding` name.
    pub fn from_server_encoding(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "LATIN1" => Self::Latin1,
            "SQL_ASCII" => Self::Ascii,
            _ => Self::Unicode,
        }
    }

    /// Whether `character` can be stored unchanged.
    pub const fn can_represent(self, character: char) -> bool {
        let code_point = character as u32;
        match self {
            Self::Unicode => true,
            Self::BasicMultilingualPlane => code_point <= 0xFFFF,
            Self::Latin1 => code_point <= 0xFF,
            Self::Ascii => code_point <= 0x7F,
        }
    }

    /// Return the first character of `text` that cannot be stored.
    pub fn first_unrepresentable(self, text: &str) -> Option<char> {
        text.chars().find(|character| !self.can_represent(*character))
    }

    /// Replace every unrepresentable character with `?`.
    pub fn sanitize(self, text: &str) -> Cow<'_, str> {
        if self.first_unrepresentable(text).is_none() {
            return Cow::Borrowed(text);
        }
        Cow::Owned(
            text.chars()
                .map(|character| {
                    if self.can_represent(character) {
                        character
                    } else {
                        REPLACEMENT
                    }
                })
                .collect(),
        )
    }

    /// Apply the substitution policy to one row.
    ///
    /// Returns the values to write and, when anything was replaced, the
    /// warning describing the first offending cell.
    pub fn sanitize_row(
        self,
        row: usize,
        columns: &[Column],
        values: &[Value],
    ) -> (Vec<Value>, Option<RowEncodingError>) {
        let mut warning = None;
        let sanitized = values
            .iter()
            .zip(columns)
            .map(|(value, column)| match value {
                Value::Text(text) => match self.first_unrepresentable(text) {
                    Some(character) => {
                        warning.get_or_insert_with(|| RowEncodingError {
                            row,
                            column: column.name().to_owned(),
                            character,
                            encoding: self,
                        });
                        Value::Text(self.sanitize(text).into_owned())
                    }
                    None => value.clone(),
                },
                Value::Null | Value::Integer(_) | Value::Float(_) => value.clone(),
            })
            .collect();
        (sanitized, warning)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unicode => "unicode",
            Self::BasicMultilingualPlane => "utf8mb3",
            Self::Latin1 => "latin1",
            Self::Ascii => "ascii",
        })
    }
}

/// A row whose text had to be altered to fit the destination encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "row {row}: column '{column}' holds U+{code_point:04X} which {encoding} cannot store",
    code_point = u32::from(*.character)
)]
pub struct RowEncodingError {
    /// Zero-based row index in the record set.
    pub row: usize,
    /// Name of the first offending column.
    pub column: String,
    /// First offending character.
    pub character: char,
    /// Encoding the row was written under.
    pub encoding: TextEncoding,
}
