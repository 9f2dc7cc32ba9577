//! # Hostsmith - Domain Block-list Aggregator
//!
//! Aggregates publicly maintained domain block-lists (advertisement,
//! malware, phishing, adult content) from dozens of remote sources and
//! emits normalized host-file and ad-blocker-filter artifacts.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Hostsmith                          │
//! ├─────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                             │
//! │    └── Commands: update, install, search, combine...    │
//! ├─────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                    │
//! │    └── Paths, sources, validation signals, caps         │
//! ├─────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls)                             │
//! │    └── Concurrent source downloads, bounded fan-out     │
//! ├─────────────────────────────────────────────────────────┤
//! │  Extractor (regex + psl)                                │
//! │    └── Per-line candidates, public-suffix check         │
//! ├─────────────────────────────────────────────────────────┤
//! │  Validator (hickory-resolver + rdap)                    │
//! │    └── NS/PTR/A/CNAME/MX/TXT/host/RDAP, OR-composed     │
//! ├─────────────────────────────────────────────────────────┤
//! │  Merger + Writer                                        │
//! │    └── Dedup, overrides, sorted atomic rewrites         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use hostsmith::config::Config;
//! use hostsmith::fetcher::Fetcher;
//! use hostsmith::extractor::{Extraction, Extractor};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("hostsmith.yaml")?;
//!
//!     let fetcher = Fetcher::new(Duration::from_secs(30))?;
//!     let extractor = Extractor::new()?;
//!
//!     let results = fetcher.fetch_sources(&config.sources, 6).await;
//!     for result in results {
//!         for line in &result.lines {
//!             if let Extraction::Candidate(domain) = extractor.extract(line) {
//!                 println!("{} ({})", domain, result.source.category);
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`extractor`] - Per-line domain extraction
//! - [`fetcher`] - HTTP client for downloading source lists
//! - [`lock`] - File locking for concurrent execution prevention
//! - [`merger`] - Deduplication and override reconciliation
//! - [`overrides`] - Exclusion/inclusion/seed list handling
//! - [`sources`] - Built-in source registry and categories
//! - [`stats`] - Run counters, summary, state persistence
//! - [`utils`] - Common formatting helpers
//! - [`validator`] - DNS/RDAP domain liveness checks
//! - [`writer`] - Output-file composition

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod lock;
pub mod merger;
pub mod overrides;
pub mod sources;
pub mod stats;
pub mod utils;
pub mod validator;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use sources::Category;
