//! Cell values and column descriptors.

/// The inferred storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Signed 64-bit integers.
    Integer,
    /// Finite 64-bit floating point numbers.
    Float,
    /// Free text.
    Text,
}

/// A named, typed column of a record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
}

impl Column {
    /// Create a column descriptor.
    ///
    /// # Example
    ///
    /// ```
    /// use record_set::{Column, ColumnType};
    ///
    /// let column = Column::new("retweet_count", ColumnType::Integer);
    /// assert_eq!(column.name(), "retweet_count");
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Returns the column name as it appeared in the header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the inferred column type.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value (an empty cell).
    Null,
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl Value {
    /// Returns the value as an `i64`, if it is an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Null | Self::Float(_) | Self::Text(_) => None,
        }
    }

    /// Returns the value as an `f64`, widening integers.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer cells stored in float columns widen like SQL numeric promotion"
    )]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            Self::Null | Self::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_to_floats() {
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::Text("3".to_owned()).as_float(), None);
    }
}
