//! Output-file composition.
//!
//! Concurrent validators never hold a file handle: every destination file
//! is owned by a single writer task fed through a channel, so appends from
//! hundreds of in-flight validations cannot interleave partial lines.

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter as AsyncBufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::config::FilterHeader;

/// Channel depth for a single destination file
const WRITE_QUEUE: usize = 1024;

/// Exclusive writer for one output file.
///
/// Created fresh (truncating) per run; lines arrive over a channel and are
/// flushed when the writer is finished. Dropping the writer without calling
/// [`ListWriter::finish`] loses buffered lines.
pub struct ListWriter {
    tx: mpsc::Sender<String>,
    task: JoinHandle<std::io::Result<usize>>,
    path: PathBuf,
}

impl ListWriter {
    /// Open `path` truncated and spawn its writer task.
    pub async fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open output file {:?}", path))?;

        let (tx, mut rx) = mpsc::channel::<String>(WRITE_QUEUE);
        let task = tokio::spawn(async move {
            let mut out = AsyncBufWriter::new(file);
            let mut written = 0usize;
            while let Some(line) = rx.recv().await {
                out.write_all(line.as_bytes()).await?;
                out.write_all(b"\n").await?;
                written += 1;
            }
            out.flush().await?;
            Ok(written)
        });

        Ok(Self {
            tx,
            task,
            path: path.to_path_buf(),
        })
    }

    /// Queue one domain for appending.
    pub async fn append(&self, domain: &str) {
        // A send error means the writer task died on I/O; the failure
        // surfaces with full context in finish().
        if self.tx.send(domain.to_string()).await.is_err() {
            warn!("Writer for {:?} is gone, dropping {}", self.path, domain);
        }
    }

    /// Close the channel, wait for the task, and return the line count.
    pub async fn finish(self) -> Result<usize> {
        drop(self.tx);
        match self.task.await {
            Ok(Ok(written)) => Ok(written),
            Ok(Err(e)) => {
                error!("Write failure on {:?}: {}", self.path, e);
                Err(e).with_context(|| format!("Failed writing {:?}", self.path))
            }
            Err(e) => Err(anyhow::anyhow!("Writer task for {:?} panicked: {}", self.path, e)),
        }
    }
}

/// Serialize a domain list as hosts-file entries: `0.0.0.0 <domain>`.
pub fn write_hosts_format(domains: &[String], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut out = BufWriter::new(file);
    for domain in domains {
        writeln!(out, "0.0.0.0 {}", domain.trim())?;
    }
    out.flush()?;
    Ok(())
}

/// Serialize a domain list as an ad-blocker filter: metadata header block,
/// then one bare domain per line.
pub fn write_filter_list(domains: &[String], path: &Path, header: &FilterHeader) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut out = BufWriter::new(file);
    let now = Utc::now();
    writeln!(out, "! Title: {}", header.title)?;
    writeln!(out, "! Description: {}", header.description)?;
    writeln!(
        out,
        "! Version: {}-{}",
        env!("CARGO_PKG_VERSION"),
        now.format("%Y%m%d%H%M%S")
    )?;
    writeln!(out, "! Last modified: {}", now.to_rfc3339())?;
    writeln!(out, "! Expires: {}", header.expires)?;
    writeln!(out, "! Homepage: {}", header.homepage)?;
    writeln!(out, "! License: {}", header.license)?;
    writeln!(out, "! Support: {}", header.support)?;
    writeln!(out, "! Domains: {}", domains.len())?;
    for domain in domains {
        writeln!(out, "{}", domain)?;
    }
    out.flush()?;
    Ok(())
}

/// Split one list file into shards no larger than `max_bytes` each, written
/// to randomly named files under `out_dir`. Returns the shard paths.
pub fn shard_file(src: &Path, out_dir: &Path, max_bytes: u64) -> Result<Vec<PathBuf>> {
    let content =
        fs::read_to_string(src).with_context(|| format!("Failed to read {:?}", src))?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create shard directory {:?}", out_dir))?;

    let mut shards = Vec::new();
    let mut current: Option<BufWriter<File>> = None;
    let mut current_len: u64 = 0;

    for line in content.lines() {
        let line_len = line.len() as u64 + 1;
        if current.is_none() || current_len + line_len > max_bytes {
            if let Some(mut done) = current.take() {
                done.flush()?;
            }
            let shard_path = out_dir.join(random_name());
            let file = File::create(&shard_path)
                .with_context(|| format!("Failed to create shard {:?}", shard_path))?;
            shards.push(shard_path);
            current = Some(BufWriter::new(file));
            current_len = 0;
        }
        if let Some(out) = current.as_mut() {
            writeln!(out, "{}", line)?;
            current_len += line_len;
        }
    }
    if let Some(mut done) = current.take() {
        done.flush()?;
    }

    Ok(shards)
}

/// Random hex file name for a shard.
fn random_name() -> String {
    let bytes: [u8; 20] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn domains(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("host{:04}.example.com", i)).collect()
    }

    #[tokio::test]
    async fn test_list_writer_appends_and_counts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list");
        let writer = ListWriter::create(&path).await.unwrap();
        writer.append("ads.example.com").await;
        writer.append("tracker.example.org").await;
        let written = writer.finish().await.unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "ads.example.com\ntracker.example.org\n");
    }

    #[tokio::test]
    async fn test_list_writer_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list");
        fs::write(&path, "stale.example.com\n").unwrap();

        let writer = ListWriter::create(&path).await.unwrap();
        writer.append("fresh.example.com").await;
        writer.finish().await.unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "fresh.example.com\n");
    }

    #[tokio::test]
    async fn test_list_writer_serializes_concurrent_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list");
        let writer = std::sync::Arc::new(ListWriter::create(&path).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..50 {
            let w = writer.clone();
            handles.push(tokio::spawn(async move {
                w.append(&format!("host{:02}.example.com", i)).await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        let writer = std::sync::Arc::into_inner(writer).unwrap();
        let written = writer.finish().await.unwrap();
        assert_eq!(written, 50);

        // Every line is whole; nothing interleaved.
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 50);
        for line in content.lines() {
            assert!(line.ends_with(".example.com"), "mangled line: {}", line);
        }
    }

    #[test]
    fn test_hosts_format_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts.blocked");
        let list = domains(10);
        write_hosts_format(&list, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let recovered: Vec<String> = content
            .lines()
            .map(|l| l.split_whitespace().nth(1).unwrap().to_string())
            .collect();
        assert_eq!(recovered, list);
        assert!(content.lines().all(|l| l.starts_with("0.0.0.0 ")));
    }

    #[test]
    fn test_filter_list_header_and_body() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filter.txt");
        let header = FilterHeader::default();
        let list = domains(3);
        write_filter_list(&list, &path, &header).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("! Title: "));
        assert!(content.contains(&format!("! Homepage: {}", header.homepage)));
        assert!(content.contains(&format!("! License: {}", header.license)));
        assert!(content.contains("! Last modified: "));
        let body: Vec<&str> = content.lines().filter(|l| !l.starts_with('!')).collect();
        assert_eq!(body, list.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_filter_list_timestamp_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filter.txt");
        write_filter_list(&domains(1), &path, &FilterHeader::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let stamp = content
            .lines()
            .find_map(|l| l.strip_prefix("! Last modified: "))
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_shard_file_respects_cap() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("list");
        let out = dir.path().join("shards");
        let list = domains(100);
        fs::write(&src, list.join("\n") + "\n").unwrap();

        let shards = shard_file(&src, &out, 200).unwrap();
        assert!(shards.len() > 1);
        for shard in &shards {
            assert!(fs::metadata(shard).unwrap().len() <= 200);
        }
    }

    #[test]
    fn test_shard_file_concatenates_losslessly() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("list");
        let out = dir.path().join("shards");
        let list = domains(57);
        fs::write(&src, list.join("\n") + "\n").unwrap();

        let shards = shard_file(&src, &out, 300).unwrap();
        let mut recovered = Vec::new();
        for shard in &shards {
            for line in fs::read_to_string(shard).unwrap().lines() {
                recovered.push(line.to_string());
            }
        }
        assert_eq!(recovered, list);
    }

    #[test]
    fn test_shard_file_single_shard_under_cap() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("list");
        let out = dir.path().join("shards");
        fs::write(&src, "a.example.com\n").unwrap();

        let shards = shard_file(&src, &out, 25 * 1024 * 1024).unwrap();
        assert_eq!(shards.len(), 1);
    }

    #[test]
    fn test_shard_file_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = shard_file(
            &dir.path().join("absent"),
            &dir.path().join("shards"),
            1024,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_random_name_shape() {
        let a = random_name();
        let b = random_name();
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
