//! Run settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{TableName, TableNameError};

/// Settings controlling one transfer run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QUERYBIN_LOADER")]
pub struct TransferSettings {
    /// Destination table name.
    pub table: Option<String>,
    /// Whole-request timeout for each query-bin call, in seconds.
    #[ortho_config(default = 300)]
    pub request_timeout_secs: u64,
    /// Database connect timeout, in seconds.
    #[ortho_config(default = 30)]
    pub connect_timeout_secs: u64,
}

impl TransferSettings {
    /// Return the validated table name, falling back to `tweets`.
    pub fn table(&self) -> Result<TableName, TableNameError> {
        self.table
            .as_deref()
            .map_or_else(|| Ok(TableName::default()), TableName::parse)
    }

    /// Return the query-bin request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Return the database connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
