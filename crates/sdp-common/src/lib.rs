//! SDP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared infrastructure for the SDP workspace members.
//!
//! # Overview
//!
//! This crate provides the logging setup used across all SDP workspace
//! members: a [`logging::LogConfig`] read from the environment and a
//! [`logging::init_logging`] function that installs the global `tracing`
//! subscriber (console output, with optional daily-rotated log files).
//!
//! # Example
//!
//! ```no_run
//! use sdp_common::logging::{init_logging, LogConfig};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!
//!     info!("Application started");
//!     Ok(())
//! }
//! ```

pub mod logging;
