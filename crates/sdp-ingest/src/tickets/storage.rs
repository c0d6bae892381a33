//! Storage layer for ticket records
//!
//! Ensures the destination table, scans existing primary-key values for
//! deduplication, and batch-inserts new rows. Inserts run in 500-row chunks
//! to stay clear of the PostgreSQL bind-parameter limit, but all chunks
//! share one transaction: any failure rolls the whole batch back.

use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::collections::HashSet;
use tracing::{debug, info};

use super::models::{TicketColumn, TicketRecord, TICKETS_TABLE};
use super::{IngestError, Result, INSERT_CHUNK_SIZE};

// ticket_id carries no uniqueness constraint: deduplication is advisory and
// happens in the loader, and the degraded mode (sources without a Ticket ID
// column) inserts NULL ids.
const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS raw_support_tickets (
    ticket_id INTEGER,
    customer_name VARCHAR(255),
    customer_email VARCHAR(255),
    customer_age INTEGER,
    customer_gender VARCHAR(50),
    product_purchased VARCHAR(255),
    date_of_purchase DATE,
    ticket_type VARCHAR(100),
    ticket_subject VARCHAR(255),
    ticket_description TEXT,
    ticket_status VARCHAR(100),
    resolution TEXT,
    ticket_priority VARCHAR(50),
    ticket_channel VARCHAR(100),
    first_response_time VARCHAR(255),
    time_to_resolution VARCHAR(255),
    customer_satisfaction_rating DOUBLE PRECISION
)
"#;

/// Storage handler for ticket rows
pub struct TicketStorage {
    db: PgPool,
}

impl TicketStorage {
    /// Create a new storage handler
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Ensure the destination table exists. Create-if-absent only; an
    /// existing table is never dropped or altered, so this is safe to call
    /// every run.
    pub async fn ensure_table(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.db)
            .await
            .map_err(IngestError::Schema)?;

        info!(table = TICKETS_TABLE, "Ensured destination table");
        Ok(())
    }

    /// Scan the full set of existing ticket ids. O(row-count) memory, which
    /// is acceptable for a batch job against this table.
    pub async fn existing_ticket_ids(&self) -> Result<HashSet<i32>> {
        let rows =
            sqlx::query("SELECT ticket_id FROM raw_support_tickets WHERE ticket_id IS NOT NULL")
                .fetch_all(&self.db)
                .await
                .map_err(IngestError::Ingestion)?;

        let mut ids = HashSet::with_capacity(rows.len());
        for row in rows {
            ids.insert(row.try_get::<i32, _>("ticket_id").map_err(IngestError::Ingestion)?);
        }

        debug!(existing = ids.len(), "Scanned existing ticket ids");
        Ok(ids)
    }

    /// Insert records in a single transaction, naming exactly the normalized
    /// source columns. Returns the number of rows inserted; an empty batch
    /// issues no database operation at all.
    pub async fn insert_tickets(
        &self,
        columns: &[TicketColumn],
        records: &[TicketRecord],
    ) -> Result<usize> {
        if records.is_empty() {
            debug!("No new rows to insert, skipping database write");
            return Ok(0);
        }

        let column_list =
            columns.iter().map(TicketColumn::as_str).collect::<Vec<_>>().join(", ");

        let mut tx = self.db.begin().await.map_err(IngestError::Ingestion)?;

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let mut query_builder: QueryBuilder<Postgres> =
                QueryBuilder::new(format!("INSERT INTO {TICKETS_TABLE} ({column_list}) "));

            query_builder.push_values(chunk, |mut b, record| {
                for column in columns {
                    match column {
                        TicketColumn::TicketId => b.push_bind(record.ticket_id),
                        TicketColumn::CustomerName => {
                            b.push_bind(record.customer_name.as_deref())
                        },
                        TicketColumn::CustomerEmail => {
                            b.push_bind(record.customer_email.as_deref())
                        },
                        TicketColumn::CustomerAge => b.push_bind(record.customer_age),
                        TicketColumn::CustomerGender => {
                            b.push_bind(record.customer_gender.as_deref())
                        },
                        TicketColumn::ProductPurchased => {
                            b.push_bind(record.product_purchased.as_deref())
                        },
                        TicketColumn::DateOfPurchase => b.push_bind(record.date_of_purchase),
                        TicketColumn::TicketType => b.push_bind(record.ticket_type.as_deref()),
                        TicketColumn::TicketSubject => {
                            b.push_bind(record.ticket_subject.as_deref())
                        },
                        TicketColumn::TicketDescription => {
                            b.push_bind(record.ticket_description.as_deref())
                        },
                        TicketColumn::TicketStatus => {
                            b.push_bind(record.ticket_status.as_deref())
                        },
                        TicketColumn::Resolution => b.push_bind(record.resolution.as_deref()),
                        TicketColumn::TicketPriority => {
                            b.push_bind(record.ticket_priority.as_deref())
                        },
                        TicketColumn::TicketChannel => {
                            b.push_bind(record.ticket_channel.as_deref())
                        },
                        TicketColumn::FirstResponseTime => {
                            b.push_bind(record.first_response_time.as_deref())
                        },
                        TicketColumn::TimeToResolution => {
                            b.push_bind(record.time_to_resolution.as_deref())
                        },
                        TicketColumn::CustomerSatisfactionRating => {
                            b.push_bind(record.customer_satisfaction_rating)
                        },
                    };
                }
            });

            query_builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(IngestError::Ingestion)?;
        }

        tx.commit().await.map_err(IngestError::Ingestion)?;

        info!(inserted = records.len(), table = TICKETS_TABLE, "Committed batch insert");
        Ok(records.len())
    }
}
