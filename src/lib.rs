//! Apache httpd Metrics Collector
//!
//! Periodically reads Apache httpd's built-in diagnostic pages and turns them
//! into Zabbix-style metric records.
//!
//! # Overview
//!
//! Each cycle runs four independent stages: a version ping, `server-status?auto`
//! (status fields and worker scoreboard), `server-info?config` (worker limit),
//! and a timed response check against a configurable target. A failing stage
//! is logged and the next one runs anyway.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   server-status      ┌──────────────┐
//! │   Apache    │   server-info        │  Collector   │
//! │   httpd     │ ◄──────────────────► │              │
//! └─────────────┘        HTTP          │  ┌────────┐  │   JSON lines   ┌──────────┐
//!                                      │  │ Stages │──┼──────────────► │ Delivery │
//! ┌─────────────┐   response check     │  └────────┘  │     stdout     └──────────┘
//! │   vhost     │ ◄──────────────────► │  ┌────────┐  │
//! └─────────────┘                      │  │ Queue  │  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`httpd`] - HTTP client and page parsers
//! - [`collectors`] - Collection stages and the per-instance collector
//! - [`record`] - Metric record definitions
//! - [`sink`] - Non-blocking delivery queue
//! - [`runner`] - Collection loop and delivery task
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use httpd_exporter::{config::Config, runner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     runner::start(config, false).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod httpd;
pub mod record;
pub mod runner;
pub mod sink;
