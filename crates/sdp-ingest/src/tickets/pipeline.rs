//! Ticket ingestion pipeline
//!
//! Sequences one run: ensure table → fetch → parse → dedup → insert.
//! Stateless across invocations beyond what dedup reads from the
//! destination table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use super::models::TicketRecord;
use super::parser::parse_tickets;
use super::source::TicketSource;
use super::storage::TicketStorage;
use super::Result;
use crate::config::DEFAULT_SOURCE_TIMEOUT_SECS;

/// Statistics for a single ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    /// Rows parsed from the source
    pub rows_fetched: usize,
    /// Rows dropped because their ticket_id already existed
    pub rows_skipped: usize,
    /// Rows actually committed
    pub rows_inserted: usize,
    /// False when the source had no ticket_id column (degraded mode)
    pub dedup_applied: bool,
    pub duration_secs: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Idempotent ticket ingestion pipeline
pub struct TicketPipeline {
    storage: TicketStorage,
    source_timeout_secs: u64,
}

impl TicketPipeline {
    pub fn new(pool: PgPool) -> Self {
        Self {
            storage: TicketStorage::new(pool),
            source_timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
        }
    }

    /// Override the remote-fetch timeout
    pub fn with_source_timeout(mut self, secs: u64) -> Self {
        self.source_timeout_secs = secs;
        self
    }

    /// Run one ingestion pass against the given source.
    ///
    /// Deduplication only applies when the source carries a ticket_id
    /// column; otherwise every row is treated as new and a warning marks the
    /// degraded mode. Either zero rows or the full new-row set is committed.
    pub async fn run(&self, source: &TicketSource) -> Result<IngestStats> {
        let started_at = Utc::now();

        self.storage.ensure_table().await?;

        let content = source.fetch(self.source_timeout_secs).await?;
        let table = parse_tickets(&content)?;
        info!(rows = table.len(), source = %source, "Fetched ticket rows");

        let dedup_applied = table.has_ticket_id();
        let columns = table.columns;
        let records = table.records;
        let rows_fetched = records.len();

        let new_records: Vec<TicketRecord> = if dedup_applied {
            let existing = self.storage.existing_ticket_ids().await?;
            records
                .into_iter()
                .filter(|record| record.ticket_id.map_or(true, |id| !existing.contains(&id)))
                .collect()
        } else {
            warn!(
                "Source has no ticket_id column; skipping deduplication and treating every row as new"
            );
            records
        };

        let rows_skipped = rows_fetched - new_records.len();
        info!(new = new_records.len(), skipped = rows_skipped, "Filtered against existing rows");

        let rows_inserted = self.storage.insert_tickets(&columns, &new_records).await?;

        let completed_at = Utc::now();
        let duration_secs = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        info!(inserted = rows_inserted, duration_secs, "Ingestion run complete");

        Ok(IngestStats {
            rows_fetched,
            rows_skipped,
            rows_inserted,
            dedup_applied,
            duration_secs,
            started_at: Some(started_at),
            completed_at: Some(completed_at),
        })
    }
}
