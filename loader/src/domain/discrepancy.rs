//! Comparison of the advertised and retrieved record counts.

use serde::Serialize;

/// Difference between the count the metadata advertised and the number of
/// rows the export actually delivered.
///
/// A discrepancy is informational. It never aborts a transfer.
///
/// # Examples
/// ```
/// use querybin_loader::domain::CountDiscrepancy;
///
/// let exact = CountDiscrepancy::new(18, 18);
/// assert!(exact.is_consistent());
///
/// let short = CountDiscrepancy::new(18, 17);
/// assert_eq!(short.deficit(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountDiscrepancy {
    expected: u64,
    retrieved: u64,
}

impl CountDiscrepancy {
    /// Compare `expected` (metadata) with `retrieved` (export rows).
    pub const fn new(expected: u64, retrieved: u64) -> Self {
        Self {
            expected,
            retrieved,
        }
    }

    /// Count advertised by the metadata.
    pub const fn expected(&self) -> u64 {
        self.expected
    }

    /// Rows present in the export.
    pub const fn retrieved(&self) -> u64 {
        self.retrieved
    }

    /// `expected - retrieved`; negative when the export holds more rows.
    pub fn deficit(&self) -> i64 {
        i128::from(self.expected)
            .saturating_sub(i128::from(self.retrieved))
            .clamp(i128::from(i64::MIN), i128::from(i64::MAX))
            .try_into()
            .unwrap_or_default()
    }

    /// Whether both counts agree.
    pub const fn is_consistent(&self) -> bool {
        self.expected == self.retrieved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(18, 18, 0)]
    #[case(18, 17, 1)]
    #[case(17, 18, -1)]
    #[case(0, 0, 0)]
    #[case(u64::MAX, 0, i64::MAX)]
    fn computes_the_deficit(#[case] expected: u64, #[case] retrieved: u64, #[case] deficit: i64) {
        let discrepancy = CountDiscrepancy::new(expected, retrieved);
        assert_eq!(discrepancy.deficit(), deficit);
        assert_eq!(discrepancy.is_consistent(), deficit == 0);
    }
}
