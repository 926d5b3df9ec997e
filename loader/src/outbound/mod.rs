//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **querybin**: reqwest-backed client for the query-bin API
//! - **persistence**: PostgreSQL-backed record table repository
//!
//! Adapters are thin translators between domain types and transport or
//! storage representations. They contain no orchestration.

pub mod persistence;
pub mod querybin;
