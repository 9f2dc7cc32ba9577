//! Compress command: split lists into size-bounded shards.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::sources::Category;
use crate::utils::format_bytes;
use crate::writer::shard_file;

/// Run the compress command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    let mut targets: Vec<(String, std::path::PathBuf)> = Category::ALL
        .iter()
        .map(|c| (c.as_str().to_string(), config.category_file(*c)))
        .collect();
    targets.push(("hosts".to_string(), config.combined_file()));

    for (name, path) in targets {
        if !path.exists() {
            debug!("No list at {:?}, skipping", path);
            continue;
        }
        let out_dir = config.compress_dir().join(&name);
        let shards = shard_file(&path, &out_dir, config.shard.max_bytes)?;
        info!(
            "{}: {} shard(s) under {} each -> {:?}",
            name,
            shards.len(),
            format_bytes(config.shard.max_bytes),
            out_dir
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_compress_shards_existing_lists() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output_dir = dir.path().to_path_buf();
        config.shard.max_bytes = 100;
        std::fs::write(
            config.category_file(Category::Advertisement),
            (0..20)
                .map(|i| format!("host{:02}.example.com\n", i))
                .collect::<String>(),
        )
        .unwrap();
        let config_path = dir.path().join("hostsmith.yaml");
        config.save(&config_path).unwrap();

        run(&config_path).await.unwrap();

        let shard_dir = config.compress_dir().join("advertisement");
        let shards: Vec<_> = std::fs::read_dir(&shard_dir).unwrap().collect();
        assert!(shards.len() > 1);
    }

    #[tokio::test]
    async fn test_compress_skips_missing_lists() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output_dir = dir.path().to_path_buf();
        let config_path = dir.path().join("hostsmith.yaml");
        config.save(&config_path).unwrap();

        run(&config_path).await.unwrap();
        assert!(!config.compress_dir().exists());
    }
}
