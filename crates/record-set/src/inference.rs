//! Column type inference over raw text cells.
//!
//! A column starts untyped and widens as cells are observed:
//! integer + float becomes float, anything mixed with text becomes text.
//! Columns that only ever held empty cells default to text.

use crate::value::ColumnType;

/// Type evidence accumulated for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Inferred {
    #[default]
    Null,
    Integer,
    Float,
    Text,
}

impl Inferred {
    /// Classify a single raw cell.
    pub(crate) fn from_cell(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Null;
        }
        if raw.parse::<i64>().is_ok() {
            return Self::Integer;
        }
        if raw.parse::<f64>().is_ok_and(f64::is_finite) {
            return Self::Float;
        }
        Self::Text
    }

    /// Combine the evidence seen so far with one more cell.
    pub(crate) const fn widen(self, other: Self) -> Self {
        match (self, other) {
            (Self::Null, next) => next,
            (current, Self::Null) => current,
            (Self::Text, _) | (_, Self::Text) => Self::Text,
            (Self::Integer, Self::Integer) => Self::Integer,
            (Self::Float | Self::Integer, Self::Float | Self::Integer) => Self::Float,
        }
    }

    /// Resolve the final column type.
    pub(crate) const fn resolve(self) -> ColumnType {
        match self {
            Self::Integer => ColumnType::Integer,
            Self::Float => ColumnType::Float,
            Self::Null | Self::Text => ColumnType::Text,
        }
    }
}
