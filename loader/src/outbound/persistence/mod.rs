//! PostgreSQL outbound adapters.

mod connection;
mod postgres_record_table_repository;
mod sql;

pub use connection::DatabaseConnection;
pub use postgres_record_table_repository::PostgresRecordTableRepository;
