//! SDP Ingest Library
//!
//! Ingestion of customer-support-ticket CSV feeds into PostgreSQL.
//!
//! A run is a linear batch job: fetch the source (local file or HTTP(S)
//! URL), parse it into typed ticket records, filter out rows whose
//! `ticket_id` is already persisted, and bulk-insert the remainder inside a
//! single transaction. Repeating a run against the same source is a no-op.
//!
//! # Example
//!
//! ```no_run
//! use sdp_ingest::config::Config;
//! use sdp_ingest::db;
//! use sdp_ingest::tickets::{TicketPipeline, TicketSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!
//!     let source = TicketSource::parse("./data/customer_support_tickets.csv")?;
//!     let stats = TicketPipeline::new(pool).run(&source).await?;
//!     println!("inserted {} rows", stats.rows_inserted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod tickets;
