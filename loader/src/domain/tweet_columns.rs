//! Canonical column layout of the tweet export.

/// Columns the tweet export carries, in export order.
pub const TWEET_EXPORT_COLUMNS: [&str; 36] = [
    "id",
    "time",
    "created_at",
    "from_user_name",
    "text",
    "filter_level",
    "possibly_sensitive",
    "withheld_copyright",
    "withheld_scope",
    "truncated",
    "retweet_count",
    "favorite_count",
    "lang",
    "to_user_name",
    "in_reply_to_status_id",
    "quoted_status_id",
    "source",
    "location",
    "lat",
    "lng",
    "from_user_id",
    "from_user_realname",
    "from_user_verified",
    "from_user_description",
    "from_user_url",
    "from_user_profile_image_url",
    "from_user_utcoffset",
    "from_user_timezone",
    "from_user_lang",
    "from_user_tweetcount",
    "from_user_followercount",
    "from_user_friendcount",
    "from_user_favourites_count",
    "from_user_listed",
    "from_user_withheld_scope",
    "from_user_created_at",
];

/// Differences between an export header and [`TWEET_EXPORT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnAudit {
    /// Canonical columns absent from the header.
    pub missing: Vec<String>,
    /// Header columns outside the canonical layout.
    pub unexpected: Vec<String>,
}

impl ColumnAudit {
    /// Compare `header` with the canonical tweet export columns.
    ///
    /// # Examples
    /// ```
    /// use querybin_loader::domain::{ColumnAudit, TWEET_EXPORT_COLUMNS};
    ///
    /// let audit = ColumnAudit::of(TWEET_EXPORT_COLUMNS);
    /// assert!(audit.is_clean());
    ///
    /// let audit = ColumnAudit::of(["id", "text", "sentiment"]);
    /// assert_eq!(audit.unexpected, vec!["sentiment".to_owned()]);
    /// assert_eq!(audit.missing.len(), 34);
    /// ```
    pub fn of<'a>(header: impl IntoIterator<Item = &'a str>) -> Self {
        let header = header.into_iter().collect::<Vec<_>>();
        let missing = TWEET_EXPORT_COLUMNS
            .iter()
            .filter(|column| !header.contains(column))
            .map(|column| (*column).to_owned())
            .collect();
        let unexpected = header
            .iter()
            .filter(|column| !TWEET_EXPORT_COLUMNS.contains(column))
            .map(|column| (*column).to_owned())
            .collect();
        Self {
            missing,
            unexpected,
        }
    }

    /// Whether the header matches the canonical column set.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_order_is_irrelevant() {
        let mut reversed = TWEET_EXPORT_COLUMNS;
        reversed.reverse();
        assert!(ColumnAudit::of(reversed).is_clean());
    }

    #[test]
    fn reports_missing_columns_in_canonical_order() {
        let header = TWEET_EXPORT_COLUMNS
            .iter()
            .copied()
            .filter(|column| !matches!(*column, "lat" | "lng"));
        let audit = ColumnAudit::of(header);
        assert_eq!(audit.missing, vec!["lat".to_owned(), "lng".to_owned()]);
        assert!(audit.unexpected.is_empty());
    }
}
