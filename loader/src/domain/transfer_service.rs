//! Query-bin transfer orchestration.
//!
//! A transfer runs in two phases:
//! - `fetch` issues the metadata GET and then the export GET, returning both
//!   bodies read to completion;
//! - `load` parses both bodies, compares the advertised and retrieved counts
//!   and appends the rows to the destination table.
//!
//! The split keeps the asynchronous HTTP work apart from the blocking
//! database work, and lets tests hand canned bodies straight to `load`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use record_set::RecordSet;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ports::{
    AppendReport, FetchedBody, QueryBinAction, QueryBinRequest, QueryBinSource,
    RecordTableRepository,
};
use super::{ColumnAudit, CountDiscrepancy, QueryBinMetadata, TableName, TransferError};

/// Identity of one transfer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRun {
    /// Random identifier attached to every log event of the run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Query bin being transferred.
    pub request: QueryBinRequest,
}

/// Both response bodies of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedExport {
    /// Metadata body (JSON).
    pub metadata: FetchedBody,
    /// Export body (CSV).
    pub export: FetchedBody,
}

/// Result of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Lowercase hex SHA-256 digest of the export body.
    pub export_digest: String,
    /// Advertised versus retrieved record counts.
    pub discrepancy: CountDiscrepancy,
    /// What the destination stored.
    pub append: AppendReport,
}

/// Flat view of a [`TransferReport`] for the final log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    /// Run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Lowercase hex SHA-256 digest of the export body.
    pub export_sha256: String,
    /// Count advertised by the metadata.
    pub expected_rows: u64,
    /// Rows present in the export.
    pub retrieved_rows: u64,
    /// `expected_rows - retrieved_rows`.
    pub deficit: i64,
    /// Rows stored in the destination table.
    pub rows_written: usize,
    /// Rows the destination refused.
    pub rows_skipped: usize,
    /// Rows stored with substituted characters.
    pub encoding_warnings: usize,
}

impl TransferReport {
    /// Flatten the report for structured logging.
    pub fn summary(&self) -> TransferSummary {
        TransferSummary {
            run_id: self.run_id,
            started_at: self.started_at,
            export_sha256: self.export_digest.clone(),
            expected_rows: self.discrepancy.expected(),
            retrieved_rows: self.discrepancy.retrieved(),
            deficit: self.discrepancy.deficit(),
            rows_written: self.append.rows_written,
            rows_skipped: self.append.rows_skipped,
            encoding_warnings: self.append.encoding_warnings.len(),
        }
    }
}

/// Domain service moving one query bin into the destination table.
#[derive(Clone)]
pub struct QueryBinTransferService<S, R> {
    source: Arc<S>,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<S, R> QueryBinTransferService<S, R> {
    /// Create a new transfer service.
    pub fn new(source: Arc<S>, repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            repository,
            clock,
        }
    }

    /// Start a run for `request`.
    pub fn begin(&self, request: QueryBinRequest) -> TransferRun {
        TransferRun {
            run_id: Uuid::new_v4(),
            started_at: self.clock.utc(),
            request,
        }
    }
}

impl<S, R> QueryBinTransferService<S, R>
where
    S: QueryBinSource,
    R: RecordTableRepository,
{
    /// Fetch the metadata and then the export.
    ///
    /// A failed metadata call aborts before the export is requested. Neither
    /// body is parsed here.
    pub async fn fetch(&self, run: &TransferRun) -> Result<FetchedExport, TransferError> {
        let metadata = self.fetch_action(run, QueryBinAction::Metadata).await?;
        let export = self.fetch_action(run, QueryBinAction::TweetExport).await?;
        Ok(FetchedExport { metadata, export })
    }

    /// Parse the fetched bodies and append the export to `table`.
    pub fn load(
        &self,
        run: &TransferRun,
        fetched: &FetchedExport,
        table: &TableName,
    ) -> Result<TransferReport, TransferError> {
        let metadata = QueryBinMetadata::parse(&fetched.metadata.bytes)?;
        debug!(
            fields = ?metadata.other_keys().collect::<Vec<_>>(),
            "query-bin metadata carries additional fields"
        );
        let records = RecordSet::from_csv(&fetched.export.bytes)?;
        audit_columns(&records);

        let retrieved = u64::try_from(records.len()).unwrap_or(u64::MAX);
        let discrepancy = CountDiscrepancy::new(metadata.number_selected_tweets, retrieved);
        log_discrepancy(discrepancy);

        let append = self.repository.append_records(table, &records)?;
        for warning in &append.encoding_warnings {
            warn!(
                row = warning.row,
                column = %warning.column,
                encoding = %warning.encoding,
                "{warning}; unrepresentable characters were replaced"
            );
        }
        info!(
            table = %table,
            rows_written = append.rows_written,
            rows_skipped = append.rows_skipped,
            "export appended"
        );

        Ok(TransferReport {
            run_id: run.run_id,
            started_at: run.started_at,
            export_digest: sha256_hex(&fetched.export.bytes),
            discrepancy,
            append,
        })
    }

    async fn fetch_action(
        &self,
        run: &TransferRun,
        action: QueryBinAction,
    ) -> Result<FetchedBody, TransferError> {
        let body = self
            .source
            .fetch(&run.request, action)
            .await
            .inspect_err(|error| {
                warn!(
                    action = action.as_str(),
                    kind = error.kind(),
                    %error,
                    "query-bin call failed"
                );
            })?;
        debug!(
            action = action.as_str(),
            bytes = body.bytes.len(),
            "query-bin call succeeded"
        );
        Ok(body)
    }
}

fn audit_columns(records: &RecordSet) {
    let audit = ColumnAudit::of(records.column_names());
    if !audit.missing.is_empty() {
        warn!(columns = ?audit.missing, "export lacks expected tweet columns");
    }
    if !audit.unexpected.is_empty() {
        warn!(columns = ?audit.unexpected, "export carries unexpected columns");
    }
}

fn log_discrepancy(discrepancy: CountDiscrepancy) {
    if discrepancy.is_consistent() {
        info!(
            expected = discrepancy.expected(),
            retrieved = discrepancy.retrieved(),
            "export row count matches metadata"
        );
    } else {
        warn!(
            expected = discrepancy.expected(),
            retrieved = discrepancy.retrieved(),
            deficit = discrepancy.deficit(),
            "export row count differs from metadata"
        );
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
#[path = "transfer_service_tests.rs"]
mod tests;
