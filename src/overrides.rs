//! User-maintained domain override files (exclusion, inclusion, seed).
//!
//! One domain per line, '#'-prefixed comments. A missing file is an empty
//! set, never an error. The files are user-edited, so each run rewrites
//! them normalized (sorted, deduplicated) on the way out.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// In-memory set of override domains. Read-only after load; shared freely
/// across validator tasks.
#[derive(Debug, Default, Clone)]
pub struct DomainSet {
    entries: BTreeSet<String>,
}

impl DomainSet {
    /// Load a one-domain-per-line file. Missing file yields an empty set.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No override file at {:?} ({}), treating as empty", path, e);
                return Self::default();
            }
        };
        Self::parse(&content)
    }

    fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { entries }
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.entries.contains(domain)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Rewrite the file sorted and deduplicated, dropping comments and
    /// blank lines the user may have left behind. No-op when absent.
    pub fn normalize_file(path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let set = Self::load(path);
        let mut content = String::new();
        for domain in set.iter() {
            content.push_str(domain);
            content.push('\n');
        }
        crate::merger::atomic_rewrite(path, &content)
            .with_context(|| format!("Failed to normalize override file {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let set = DomainSet::load(Path::new("/nonexistent/exclusion"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let set = DomainSet::parse("# comment\n\nads.example.com\n  tracker.example.org  \n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("ads.example.com"));
        assert!(set.contains("tracker.example.org"));
    }

    #[test]
    fn test_parse_lowercases() {
        let set = DomainSet::parse("ADS.Example.COM\n");
        assert!(set.contains("ads.example.com"));
    }

    #[test]
    fn test_parse_deduplicates() {
        let set = DomainSet::parse("a.example.com\na.example.com\n");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_normalize_file_sorts_and_dedups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exclusion");
        std::fs::write(&path, "b.example.com\n# note\na.example.com\nb.example.com\n").unwrap();

        DomainSet::normalize_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a.example.com\nb.example.com\n");
    }

    #[test]
    fn test_normalize_file_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exclusion");
        std::fs::write(&path, "b.example.com\na.example.com\n").unwrap();

        DomainSet::normalize_file(&path).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        DomainSet::normalize_file(&path).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_missing_file_is_noop() {
        let dir = TempDir::new().unwrap();
        assert!(DomainSet::normalize_file(&dir.path().join("absent")).is_ok());
    }
}
