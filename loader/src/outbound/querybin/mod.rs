//! Query-bin outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `QueryBinSource`
//! port, plus the URL and authorization helpers it is built from.

mod auth;
mod http_source;
mod request;

pub use auth::basic_authorization;
pub use http_source::QueryBinHttpSource;
pub use request::request_url;
