//! Transfer failures surfaced to the operator.
//!
//! Port and parser errors are folded into [`TransferError`] so the binary
//! reports one category per failure. Row encoding problems are not errors;
//! they travel in the append report.

use record_set::RecordSetError;
use thiserror::Error;

use super::MetadataError;
use super::ports::{QueryBinSourceError, RecordTableRepositoryError};
use crate::config::ConfigurationError;

/// Fatal failures of one transfer run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The configuration is missing or invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The query-bin API refused the credentials.
    #[error("query-bin API rejected the credentials with status {status}")]
    Authentication { status: u16 },
    /// The query-bin API could not be reached or answered with an error.
    #[error("query-bin request failed: {message}")]
    Network { message: String },
    /// A response body could not be parsed.
    #[error("response could not be parsed: {message}")]
    Parse { message: String },
    /// The destination database could not be reached.
    #[error("database connection failed: {message}")]
    DatabaseConnection { message: String },
    /// The destination table could not be created or written.
    #[error("database load failed: {message}")]
    Database { message: String },
}

impl From<QueryBinSourceError> for TransferError {
    fn from(error: QueryBinSourceError) -> Self {
        match error {
            QueryBinSourceError::Authentication { status } => Self::Authentication { status },
            QueryBinSourceError::Transport { .. }
            | QueryBinSourceError::Timeout { .. }
            | QueryBinSourceError::UnexpectedStatus { .. }
            | QueryBinSourceError::InvalidRequest { .. } => Self::Network {
                message: error.to_string(),
            },
        }
    }
}

impl From<RecordTableRepositoryError> for TransferError {
    fn from(error: RecordTableRepositoryError) -> Self {
        match error {
            RecordTableRepositoryError::Connection { message } => {
                Self::DatabaseConnection { message }
            }
            RecordTableRepositoryError::Schema { .. } | RecordTableRepositoryError::Query { .. } => {
                Self::Database {
                    message: error.to_string(),
                }
            }
        }
    }
}

impl From<MetadataError> for TransferError {
    fn from(error: MetadataError) -> Self {
        Self::Parse {
            message: error.to_string(),
        }
    }
}

impl From<RecordSetError> for TransferError {
    fn from(error: RecordSetError) -> Self {
        Self::Parse {
            message: format!("tweet export: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(401)]
    #[case(403)]
    fn rejected_credentials_stay_distinct(#[case] status: u16) {
        let error = TransferError::from(QueryBinSourceError::authentication(status));
        assert_eq!(error, TransferError::Authentication { status });
    }

    #[rstest]
    #[case(QueryBinSourceError::unexpected_status(500_u16, "boom"))]
    #[case(QueryBinSourceError::transport("connection refused"))]
    #[case(QueryBinSourceError::timeout("after 300s"))]
    fn other_source_failures_are_network_errors(#[case] source: QueryBinSourceError) {
        let expected = source.to_string();
        assert_eq!(
            TransferError::from(source),
            TransferError::Network { message: expected }
        );
    }

    #[test]
    fn repository_connection_failures_keep_their_category() {
        let error = TransferError::from(RecordTableRepositoryError::connection("refused"));
        assert_eq!(
            error,
            TransferError::DatabaseConnection {
                message: "refused".to_owned()
            }
        );
    }

    #[test]
    fn ragged_exports_are_parse_errors() {
        let error = TransferError::from(RecordSetError::RaggedRow {
            line: 3,
            expected: 2,
            found: 1,
        });
        assert!(matches!(error, TransferError::Parse { .. }));
    }
}
