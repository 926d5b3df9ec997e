//! Embedded PostgreSQL helpers for loader integration tests.
//!
//! Each scenario gets its own database, created from `template0` on the
//! process-wide embedded cluster. Set `SKIP_TEST_CLUSTER=1` to skip
//! scenarios where the cluster cannot start.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use querybin_loader::config::DatabaseConfig;
use querybin_loader::domain::TextEncoding;
use url::Url;
use uuid::Uuid;
use zeroize::Zeroizing;

const TEMPLATE: &str = "template0";

/// Returns true when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster setup failure.
///
/// Returns the reason when skipping is allowed, and panics otherwise so a
/// broken cluster never passes silently.
pub fn handle_cluster_setup_failure(reason: impl std::fmt::Display) -> String {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        reason.to_string()
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Create an empty database on the shared embedded cluster.
pub fn provision_database() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|error| format!("{error:?}"))?;
    let name = format!("querybin_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(name.as_str(), TEMPLATE)
        .map_err(|error| format!("create database {name}: {error:?}"))
}

/// Split a database URL into the `[database]` group the loader reads.
pub fn database_config(
    database_url: &str,
    charset: Option<TextEncoding>,
) -> Result<DatabaseConfig, String> {
    let url = Url::parse(database_url).map_err(|error| error.to_string())?;
    let host = url.host_str().ok_or("database URL has no host")?;
    let server = url
        .port()
        .map_or_else(|| host.to_owned(), |port| format!("{host}:{port}"));
    Ok(DatabaseConfig {
        engine: "postgresql".to_owned(),
        server,
        user: url.username().to_owned(),
        passwd: Zeroizing::new(url.password().unwrap_or_default().to_owned()),
        db: url.path().trim_start_matches('/').to_owned(),
        charset,
    })
}

/// Render a `postgres` error with its SQLSTATE and message.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    match error.as_db_error() {
        Some(db_error) => format!(
            "postgres error {:?}: {}",
            db_error.code(),
            db_error.message()
        ),
        None => error.to_string(),
    }
}
