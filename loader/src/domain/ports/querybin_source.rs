//! Driven port for fetching query-bin responses from the research tool API.
//!
//! The port returns owned response bodies read to completion. Parsing
//! happens afterwards in the domain, so tests can hand canned buffers to the
//! transfer service without any HTTP traffic.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::define_port_error;

/// Identifies one query bin and the optional export window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBinRequest {
    /// Query-bin identifier (first path segment after the endpoint).
    pub querybin: String,
    /// Controller name (second path segment after the endpoint).
    pub controller: String,
    /// Inclusive lower bound for exported records.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound for exported records.
    pub end_date: Option<NaiveDate>,
}

impl QueryBinRequest {
    /// Build a request without a date window.
    pub fn new(querybin: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            querybin: querybin.into(),
            controller: controller.into(),
            start_date: None,
            end_date: None,
        }
    }

    /// Restrict the export to records on or after `date`.
    #[must_use]
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Restrict the export to records on or before `date`.
    #[must_use]
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }
}

/// The two source API operations issued per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryBinAction {
    /// Default action: JSON metadata including the selected-record count.
    Metadata,
    /// `tweet-export` action returning the bin contents as CSV.
    TweetExport,
}

impl QueryBinAction {
    /// Label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::TweetExport => "tweet-export",
        }
    }
}

/// A successful (HTTP 200) response body, read to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchedBody {
    /// Raw response bytes.
    pub bytes: Vec<u8>,
}

impl FetchedBody {
    /// Wrap an owned buffer.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

define_port_error! {
    /// Errors surfaced while calling the query-bin API.
    pub enum QueryBinSourceError {
        /// The request never produced a response.
        Transport { message: String } =>
            "query-bin transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "query-bin request timed out: {message}",
        /// The server refused the credentials.
        Authentication { status: u16 } =>
            "query-bin rejected credentials with status {status}",
        /// The server answered with a status other than 200.
        UnexpectedStatus { status: u16, message: String } =>
            "query-bin returned status {status}: {message}",
        /// The request could not be built from the configured values.
        InvalidRequest { message: String } =>
            "query-bin request invalid: {message}",
    }
}

/// Port for fetching metadata and export bodies for one query bin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryBinSource: Send + Sync {
    /// Issue one GET for `action` and return the body of a 200 response.
    ///
    /// Non-200 responses are reported as errors and their bodies are never
    /// returned for parsing.
    async fn fetch(
        &self,
        request: &QueryBinRequest,
        action: QueryBinAction,
    ) -> Result<FetchedBody, QueryBinSourceError>;
}

/// Fixture implementation replaying canned metadata and export bodies.
///
/// # Examples
///
/// ```
/// use querybin_loader::domain::ports::{FixtureQueryBinSource, QueryBinSourceError};
///
/// let source = FixtureQueryBinSource::new(r#"{"number-selected-tweets": 0}"#, "id\n");
/// let failing = FixtureQueryBinSource::new("{}", "")
///     .with_export_error(QueryBinSourceError::authentication(401_u16));
/// # let _ = (source, failing);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureQueryBinSource {
    metadata: FetchedBody,
    export: FetchedBody,
    export_error: Option<QueryBinSourceError>,
}

impl FixtureQueryBinSource {
    /// Replay the given metadata and export bodies.
    pub fn new(metadata: impl Into<Vec<u8>>, export: impl Into<Vec<u8>>) -> Self {
        Self {
            metadata: FetchedBody::new(metadata),
            export: FetchedBody::new(export),
            export_error: None,
        }
    }

    /// Fail the export call with `error` instead of returning the body.
    #[must_use]
    pub fn with_export_error(mut self, error: QueryBinSourceError) -> Self {
        self.export_error = Some(error);
        self
    }
}

#[async_trait]
impl QueryBinSource for FixtureQueryBinSource {
    async fn fetch(
        &self,
        _request: &QueryBinRequest,
        action: QueryBinAction,
    ) -> Result<FetchedBody, QueryBinSourceError> {
        match action {
            QueryBinAction::Metadata => Ok(self.metadata.clone()),
            QueryBinAction::TweetExport => match &self.export_error {
                Some(error) => Err(error.clone()),
                None => Ok(self.export.clone()),
            },
        }
    }
}
