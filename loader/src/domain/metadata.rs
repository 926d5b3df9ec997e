//! Query-bin metadata returned by the default API action.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Key holding the number of records the bin selected.
pub const SELECTED_TWEETS_KEY: &str = "number-selected-tweets";

/// Failures while decoding the metadata body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The body is not a JSON object with the expected fields.
    #[error("query-bin metadata is malformed: {message}")]
    Malformed { message: String },
}

/// Metadata describing one query bin.
///
/// Only the selected-record count is interpreted. Every other top-level
/// field is retained untouched.
///
/// # Examples
/// ```
/// use querybin_loader::domain::QueryBinMetadata;
///
/// let metadata = QueryBinMetadata::parse(
///     br#"{"number-selected-tweets": 18, "bin": {"name": "climate"}}"#,
/// )
/// .expect("valid metadata");
/// assert_eq!(metadata.number_selected_tweets, 18);
/// assert_eq!(metadata.other_keys().collect::<Vec<_>>(), vec!["bin"]);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryBinMetadata {
    /// Number of records the bin reports for the requested window.
    #[serde(rename = "number-selected-tweets", deserialize_with = "count")]
    pub number_selected_tweets: u64,
    /// Remaining top-level fields.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl QueryBinMetadata {
    /// Decode a metadata response body.
    pub fn parse(bytes: &[u8]) -> Result<Self, MetadataError> {
        serde_json::from_slice(bytes).map_err(|error| MetadataError::Malformed {
            message: error.to_string(),
        })
    }

    /// Names of the uninterpreted top-level fields.
    pub fn other_keys(&self) -> impl Iterator<Item = &str> {
        self.other.keys().map(String::as_str)
    }
}

/// Accept the count as a JSON integer or as a decimal string.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(u64),
        Text(String),
    }

    match RawCount::deserialize(deserializer)? {
        RawCount::Number(value) => Ok(value),
        RawCount::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "{SELECTED_TWEETS_KEY} must be a non-negative integer, got '{text}'"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(br#"{"number-selected-tweets": 18}"#.as_slice(), 18)]
    #[case(br#"{"number-selected-tweets": "17"}"#.as_slice(), 17)]
    #[case(br#"{"number-selected-tweets": 0, "bin": "x"}"#.as_slice(), 0)]
    fn reads_the_selected_count(#[case] body: &[u8], #[case] expected: u64) {
        let metadata = QueryBinMetadata::parse(body).expect("metadata should parse");
        assert_eq!(metadata.number_selected_tweets, expected);
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"not json".as_slice())]
    #[case(br#"{"bin": "climate"}"#.as_slice())]
    #[case(br#"{"number-selected-tweets": -1}"#.as_slice())]
    #[case(br#"{"number-selected-tweets": "many"}"#.as_slice())]
    #[case(br#"[18]"#.as_slice())]
    fn rejects_malformed_metadata(#[case] body: &[u8]) {
        assert!(matches!(
            QueryBinMetadata::parse(body),
            Err(MetadataError::Malformed { .. })
        ));
    }

    #[test]
    fn keeps_unknown_fields() {
        let metadata = QueryBinMetadata::parse(
            br#"{"number-selected-tweets": 3, "period": {"start": "2024-01-01"}, "phrases": []}"#,
        )
        .expect("metadata should parse");
        assert_eq!(
            metadata.other_keys().collect::<Vec<_>>(),
            vec!["period", "phrases"]
        );
    }
}
