//! Hostsmith - Domain Block-list Aggregator

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hostsmith::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Batch-tool convention: invoked with no arguments at all, do nothing
    // and exit clean.
    if std::env::args().len() < 2 {
        return Ok(());
    }

    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Update => hostsmith::commands::update::run(&cli.config).await,
        Commands::Install => hostsmith::commands::install::run(&cli.config).await,
        Commands::Uninstall => hostsmith::commands::uninstall::run(&cli.config).await,
        Commands::Search { term } => hostsmith::commands::search::run(&term, &cli.config).await,
        Commands::Combine => hostsmith::commands::combine::run(&cli.config).await,
        Commands::Compress => hostsmith::commands::compress::run(&cli.config).await,
        Commands::Version => {
            println!("hostsmith {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
