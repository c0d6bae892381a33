//! SDP Ingest - support-ticket data ingestion tool

use anyhow::Result;
use clap::Parser;
use sdp_common::logging::{init_logging, LogConfig, LogLevel};
use sdp_ingest::config::Config;
use sdp_ingest::db;
use sdp_ingest::tickets::{TicketPipeline, TicketSource};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "sdp-ingest")]
#[command(author, version, about = "SDP support-ticket ingestion tool")]
struct Cli {
    /// CSV source: local file path or HTTP(S) URL
    #[arg(
        short,
        long,
        env = "TICKETS_SOURCE",
        default_value = "/app/files/customer_support_tickets.csv"
    )]
    source: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if std::env::var("LOG_FILE_PREFIX").is_err() {
        log_config.file_prefix = "sdp-ingest".to_string();
    }
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    info!("Starting ticket ingestion");

    let config = Config::load()?;
    let source = TicketSource::parse(&cli.source)?;

    let pool = db::create_pool(&config.database).await?;

    let pipeline =
        TicketPipeline::new(pool.clone()).with_source_timeout(config.source_timeout_secs);

    let stats = match pipeline.run(&source).await {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, "Ticket ingestion failed");
            pool.close().await;
            return Err(e.into());
        },
    };

    pool.close().await;

    info!(
        fetched = stats.rows_fetched,
        skipped = stats.rows_skipped,
        inserted = stats.rows_inserted,
        "Ticket ingestion completed successfully"
    );

    Ok(())
}
