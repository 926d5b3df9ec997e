//! Reqwest-backed query-bin source adapter.
//!
//! This adapter owns transport details only: URL construction, the Basic
//! authorization header, timeout and HTTP status mapping. Bodies are read to
//! completion and handed back unparsed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{basic_authorization, request_url};
use crate::config::SourceConfig;
use crate::domain::ports::{
    FetchedBody, QueryBinAction, QueryBinRequest, QueryBinSource, QueryBinSourceError,
};

const DEFAULT_USER_AGENT: &str = concat!("querybin-loader/", env!("CARGO_PKG_VERSION"));

/// Query-bin source adapter issuing authenticated HTTP GET requests.
pub struct QueryBinHttpSource {
    client: Client,
    source: SourceConfig,
}

impl QueryBinHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(source: SourceConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, source })
    }

    fn authorization(&self) -> Result<HeaderValue, QueryBinSourceError> {
        let header = basic_authorization(&self.source.user, &self.source.passwd);
        let mut value = HeaderValue::from_str(&header).map_err(|error| {
            QueryBinSourceError::invalid_request(format!("authorization header: {error}"))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[async_trait]
impl QueryBinSource for QueryBinHttpSource {
    async fn fetch(
        &self,
        request: &QueryBinRequest,
        action: QueryBinAction,
    ) -> Result<FetchedBody, QueryBinSourceError> {
        let url = request_url(&self.source.endpoint, request, action)?;
        debug!(
            action = action.as_str(),
            url = %url,
            realm = %self.source.realm,
            "requesting query-bin"
        );
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.authorization()?)
            .header(ACCEPT, accept_for(action))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status != StatusCode::OK {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(FetchedBody::new(body.to_vec()))
    }
}

const fn accept_for(action: QueryBinAction) -> &'static str {
    match action {
        QueryBinAction::Metadata => "application/json",
        QueryBinAction::TweetExport => "text/csv",
    }
}

fn map_transport_error(error: reqwest::Error) -> QueryBinSourceError {
    if error.is_timeout() {
        QueryBinSourceError::timeout(error.to_string())
    } else {
        QueryBinSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> QueryBinSourceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            QueryBinSourceError::authentication(status.as_u16())
        }
        _ => QueryBinSourceError::unexpected_status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
