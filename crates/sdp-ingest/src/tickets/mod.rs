// Support-ticket ingestion module
//
// One run is a straight-line sequence with no intermediate state:
// - Source: fetch the raw CSV from a local file or an HTTP(S) URL
// - Parse: normalize header names and parse rows into typed records
// - Store: scan existing ticket ids, batch-insert new rows in one transaction
// - Pipeline: orchestration and run statistics
//
// Deduplication is advisory. The destination table carries no uniqueness
// constraint on ticket_id, and concurrent runs are not coordinated; the
// check-then-insert gap is accepted for a low-frequency batch job.

pub mod models;
pub mod parser;
pub mod pipeline;
pub mod source;
pub mod storage;

// Re-export main types
pub use models::{normalize_column_name, TicketColumn, TicketRecord, TicketTable, TICKETS_TABLE};
pub use parser::parse_tickets;
pub use pipeline::{IngestStats, TicketPipeline};
pub use source::TicketSource;
pub use storage::TicketStorage;

/// Rows per INSERT statement. All chunks run inside one transaction; the
/// chunking only keeps each statement clear of the PostgreSQL bind-parameter
/// limit (65,535).
pub const INSERT_CHUNK_SIZE: usize = 500;

/// Result type for ticket ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error types for ticket ingestion, one variant per phase
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("failed to create or verify destination table: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("ingestion failed, transaction rolled back: {0}")]
    Ingestion(#[source] sqlx::Error),
}
