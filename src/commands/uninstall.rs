//! Uninstall command: remove the installed hosts file.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::commands::install::system_hosts_path;

/// Run the uninstall command
pub async fn run(_config_path: &Path) -> Result<()> {
    let target = system_hosts_path()?;
    if !target.exists() {
        warn!("Nothing to uninstall: {:?} does not exist", target);
        return Ok(());
    }
    std::fs::remove_file(&target)
        .with_context(|| format!("Failed to remove {:?}", target))?;
    info!("Removed {:?}", target);
    Ok(())
}
