//! Error types for Hostsmith.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported platform: no known hosts file location for {0}")]
    UnsupportedPlatform(String),

    #[error("Install target already exists: {0} (run uninstall first)")]
    AlreadyInstalled(PathBuf),

    #[error("Not installed: {0} does not exist")]
    NotInstalled(PathBuf),
}
