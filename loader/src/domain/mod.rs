//! Domain primitives and the transfer service.
//!
//! Purpose: turn two query-bin responses into rows of a destination table
//! without knowing how either side is reached. Adapters plug in through
//! [`ports`].
//!
//! Public surface:
//! - QueryBinTransferService: fetch then load one query bin.
//! - QueryBinMetadata and CountDiscrepancy: the advertised record count and
//!   how the export compares with it.
//! - TextEncoding and RowEncodingError: the destination's character
//!   repertoire and per-row substitution warnings.
//! - TableName: validated destination table.
//! - TransferError: fatal failures reported to the operator.

pub mod ports;

mod discrepancy;
mod encoding;
mod error;
mod metadata;
mod table_name;
mod transfer_service;
mod tweet_columns;

pub use self::discrepancy::CountDiscrepancy;
pub use self::encoding::{RowEncodingError, TextEncoding};
pub use self::error::TransferError;
pub use self::metadata::{MetadataError, QueryBinMetadata, SELECTED_TWEETS_KEY};
pub use self::table_name::{DEFAULT_TABLE_NAME, TableName, TableNameError};
pub use self::transfer_service::{
    FetchedExport, QueryBinTransferService, TransferReport, TransferRun, TransferSummary,
};
pub use self::tweet_columns::{ColumnAudit, TWEET_EXPORT_COLUMNS};
