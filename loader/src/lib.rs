//! Query-bin loader library.
//!
//! Moves one query bin from a social-media research tool into a relational
//! table: read the connection file, fetch the bin's metadata and its tweet
//! export over HTTP, parse both, and append the rows to the destination
//! table, creating it when missing.
//!
//! The crate is laid out as a hexagon. [`domain`] holds the orchestration
//! and the ports it drives; [`outbound`] holds the HTTP and PostgreSQL
//! adapters; [`config`] reads the connection file and run settings.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
