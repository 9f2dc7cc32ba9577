//! Deduplication and merge of accumulated list files.
//!
//! Phase two of a run: the validator has appended domains in arrival order,
//! possibly with duplicates. This stage reads a list back, deduplicates,
//! reconciles the user overrides, sorts, and atomically replaces the file
//! with the canonical content. Running it twice with no new input yields
//! byte-identical output.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::overrides::DomainSet;

/// Counts from one merge pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeOutcome {
    pub kept: usize,
    pub duplicates: usize,
    pub excluded: usize,
    pub included: usize,
}

/// Read a plain domain-list file; a missing or unreadable file is an empty
/// list, never fatal.
pub fn read_domain_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!("Could not read {:?} ({}), treating as empty list", path, e);
            Vec::new()
        }
    }
}

/// The registrable base of a domain (`sub.example.com` -> `example.com`).
pub fn registrable_base(domain: &str) -> Option<&str> {
    psl::domain(domain.as_bytes()).and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
}

fn is_excluded(domain: &str, exclusions: &DomainSet, subdomain_aware: bool) -> bool {
    if exclusions.contains(domain) {
        return true;
    }
    if subdomain_aware {
        if let Some(base) = registrable_base(domain) {
            return exclusions.contains(base);
        }
    }
    false
}

/// Produce the canonical form of a raw domain list: deduplicated, exclusion
/// entries removed (subdomain-aware when enabled), inclusion entries
/// appended verbatim, sorted lexicographically.
pub fn merge(
    raw: Vec<String>,
    exclusions: &DomainSet,
    inclusions: Option<&DomainSet>,
    subdomain_aware: bool,
) -> (Vec<String>, MergeOutcome) {
    let mut outcome = MergeOutcome::default();
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut kept: Vec<String> = Vec::with_capacity(raw.len());

    for domain in raw {
        if !seen.insert(domain.clone()) {
            outcome.duplicates += 1;
            continue;
        }
        if is_excluded(&domain, exclusions, subdomain_aware) {
            outcome.excluded += 1;
            continue;
        }
        kept.push(domain);
    }

    // Inclusions are never validated; exclusion still wins over inclusion.
    if let Some(inclusions) = inclusions {
        for domain in inclusions.iter() {
            if seen.insert(domain.to_string())
                && !is_excluded(domain, exclusions, subdomain_aware)
            {
                kept.push(domain.to_string());
                outcome.included += 1;
            }
        }
    }

    kept.sort_unstable();
    outcome.kept = kept.len();
    (kept, outcome)
}

/// Merge a list file in place: read, canonicalize, atomically replace.
pub fn finalize_list(
    path: &Path,
    exclusions: &DomainSet,
    inclusions: Option<&DomainSet>,
    subdomain_aware: bool,
) -> Result<MergeOutcome> {
    let raw = read_domain_lines(path);
    let (kept, outcome) = merge(raw, exclusions, inclusions, subdomain_aware);

    let mut content = String::with_capacity(kept.len() * 16);
    for domain in &kept {
        content.push_str(domain);
        content.push('\n');
    }
    atomic_rewrite(path, &content)
        .with_context(|| format!("Failed to rewrite list {:?}", path))?;
    Ok(outcome)
}

/// Replace a file's content via tempfile + rename; readers never observe a
/// half-written list.
pub fn atomic_rewrite(path: &Path, content: &str) -> Result<()> {
    let parent_dir = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create directory {:?}", parent_dir))?;
    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent_dir))?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist {:?}", path))?;
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn domain_strategy() -> impl Strategy<Value = String> {
        "[a-z]{1,8}\\.(example|test-site)\\.(com|org|net)"
    }

    fn domain_vec_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(domain_strategy(), 0..max)
    }

    proptest! {
        /// Merged output is sorted and free of duplicates.
        #[test]
        fn prop_merge_sorted_unique(raw in domain_vec_strategy(100)) {
            let (kept, _) = merge(raw, &DomainSet::default(), None, true);
            let mut sorted = kept.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(kept, sorted);
        }

        /// No excluded domain survives a merge.
        #[test]
        fn prop_merge_respects_exclusions(
            raw in domain_vec_strategy(50),
            excluded_idx in 0usize..50,
        ) {
            if raw.is_empty() {
                return Ok(());
            }
            let target = raw[excluded_idx % raw.len()].clone();
            let dir = tempfile::TempDir::new().unwrap();
            let path = dir.path().join("ex");
            std::fs::write(&path, &target).unwrap();
            let exclusions = DomainSet::load(&path);

            let (kept, _) = merge(raw, &exclusions, None, false);
            prop_assert!(!kept.contains(&target));
        }

        /// Merging is idempotent: canonical input maps to itself.
        #[test]
        fn prop_merge_idempotent(raw in domain_vec_strategy(100)) {
            let empty = DomainSet::default();
            let (once, _) = merge(raw, &empty, None, true);
            let (twice, _) = merge(once.clone(), &empty, None, true);
            prop_assert_eq!(once, twice);
        }
    }
}
