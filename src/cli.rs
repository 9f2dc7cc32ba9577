//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hostsmith")]
#[command(author, version, about = "Domain block-list aggregator")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "hostsmith.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (per-line extraction and validation logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild every category list from the remote sources
    Update,

    /// Install a category list into the system hosts file
    Install,

    /// Remove the installed list from the system hosts file
    Uninstall,

    /// Search the local lists for a domain
    Search {
        /// Substring to look for
        term: String,
    },

    /// Merge the category lists into the combined artifacts
    Combine,

    /// Split the lists into size-bounded shards
    Compress,

    /// Show version
    Version,
}
