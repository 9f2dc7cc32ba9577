//! Configuration management for Hostsmith.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sources::{default_sources, Category, Source};
use crate::validator::Signal;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the per-category lists and derived artifacts
    pub output_dir: PathBuf,

    /// User-maintained exclusion list (one domain per line, '#' comments)
    pub exclusion_file: PathBuf,

    /// User-maintained inclusion list (one domain per line, '#' comments)
    pub inclusion_file: PathBuf,

    /// Optional seed list of domains fed straight into validation
    pub seed_file: PathBuf,

    /// Maintain the all-categories combined list during update
    pub combined: bool,

    /// Excluding example.com also excludes sub.example.com
    pub subdomain_exclusion: bool,

    /// HTTP fetch settings
    pub fetch: FetchConfig,

    /// Domain validation settings
    pub validation: ValidationConfig,

    /// Size-sharded output settings
    pub shard: ShardConfig,

    /// Ad-blocker filter header fields
    pub filter: FilterHeader,

    /// Remote block-list sources
    pub sources: Vec<Source>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("configs"),
            exclusion_file: PathBuf::from("configs/exclusion"),
            inclusion_file: PathBuf::from("configs/inclusion"),
            seed_file: PathBuf::from("configs/validate"),
            combined: true,
            subdomain_exclusion: true,
            fetch: FetchConfig::default(),
            validation: ValidationConfig::default(),
            shard: ShardConfig::default(),
            filter: FilterHeader::default(),
            sources: default_sources(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    /// A batch run on a fresh machine works without any setup.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path.as_ref());
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.fetch.max_concurrent == 0 {
            anyhow::bail!("fetch.max_concurrent must be at least 1");
        }
        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("fetch.timeout_secs must be at least 1");
        }
        if self.validation.max_concurrent == 0 {
            anyhow::bail!("validation.max_concurrent must be at least 1");
        }
        if self.validation.timeout_secs == 0 {
            anyhow::bail!("validation.timeout_secs must be at least 1");
        }
        if self.validation.signals.is_empty() && !self.validation.connect_probes {
            anyhow::bail!("validation.signals must name at least one signal");
        }
        if self.shard.max_bytes == 0 {
            anyhow::bail!("shard.max_bytes must be at least 1");
        }
        for source in &self.sources {
            if !source.url.starts_with("https://") {
                anyhow::bail!(
                    "Source URL must use HTTPS: {} ({})",
                    source.url,
                    source.category
                );
            }
        }
        Ok(())
    }

    /// Save configuration to YAML file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = serde_yaml::to_string(self).with_context(|| "Failed to serialize config")?;

        let parent_dir = path.parent().unwrap_or(Path::new("."));
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }

    /// Path of a category's plain domain list
    pub fn category_file(&self, category: Category) -> PathBuf {
        self.output_dir.join(category.as_str())
    }

    /// Path of the combined plain domain list
    pub fn combined_file(&self) -> PathBuf {
        self.output_dir.join("hosts")
    }

    /// Path of the ad-blocker filter artifact
    pub fn filter_file(&self) -> PathBuf {
        self.output_dir.join("filter.txt")
    }

    /// Path of the hosts-format artifact derived from the combined list
    pub fn hosts_format_file(&self) -> PathBuf {
        self.output_dir.join("hosts.blocked")
    }

    /// Root folder for size-sharded output
    pub fn compress_dir(&self) -> PathBuf {
        self.output_dir.join("compress")
    }

    /// Path of the persisted run state
    pub fn state_file(&self) -> PathBuf {
        self.output_dir.join("state.json")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Concurrent source downloads
    pub max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_concurrent: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Signals tried in order until one succeeds. Any single success marks
    /// the domain valid.
    pub signals: Vec<Signal>,
    /// Also try raw TCP connects and HTTP probes on ports 80/443.
    /// Off by default: intended for install-time configurations only.
    pub connect_probes: bool,
    /// Per-signal timeout in seconds
    pub timeout_secs: u64,
    /// Concurrent domain validations
    pub max_concurrent: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            signals: vec![
                Signal::Ns,
                Signal::Ptr,
                Signal::Ip,
                Signal::Cname,
                Signal::Mx,
                Signal::Txt,
                Signal::Host,
                Signal::Rdap,
            ],
            connect_probes: false,
            timeout_secs: 5,
            max_concurrent: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardConfig {
    /// Maximum bytes per shard (default 25 MB, the upload unit cap)
    pub max_bytes: u64,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            max_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Metadata header written at the top of the ad-blocker filter artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterHeader {
    pub title: String,
    pub description: String,
    pub expires: String,
    pub homepage: String,
    pub license: String,
    pub support: String,
}

impl Default for FilterHeader {
    fn default() -> Self {
        Self {
            title: "Hostsmith Blocklist".to_string(),
            description: "Aggregated advertisement, malware, phishing and adult-content domains"
                .to_string(),
            expires: "1 day".to_string(),
            homepage: "https://github.com/hostsmith/hostsmith".to_string(),
            license: "MIT".to_string(),
            support: "https://github.com/hostsmith/hostsmith/issues".to_string(),
        }
    }
}
