//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the transfer service expects to reach the query-bin
//! API and the destination database. Each trait exposes a strongly typed
//! error so adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod querybin_source;
mod record_table_repository;

#[cfg(test)]
pub use querybin_source::MockQueryBinSource;
pub use querybin_source::{
    FetchedBody, FixtureQueryBinSource, QueryBinAction, QueryBinRequest, QueryBinSource,
    QueryBinSourceError,
};
#[cfg(test)]
pub use record_table_repository::MockRecordTableRepository;
pub use record_table_repository::{
    AppendReport, InMemoryRecordTableRepository, RecordTableRepository,
    RecordTableRepositoryError,
};
