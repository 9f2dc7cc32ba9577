//! Per-line domain extraction from fetched block-list text.

use anyhow::{Context, Result};
use regex::Regex;
use std::net::IpAddr;

/// Domain-shaped token: one or more dot-terminated labels followed by a final
/// label, lowercase alphanumerics plus underscore and interior hyphens, each
/// label at most 63 characters.
const DOMAIN_PATTERN: &str =
    r"(?:[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9])?\.)+[a-z0-9][a-z0-9-]{0,61}[a-z0-9]";

/// What a single input line yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A syntactically valid candidate with a recognized public suffix.
    Candidate(String),
    /// Empty line, comment, or no domain-shaped token present.
    Nothing,
    /// A token was found but failed the syntax checks.
    RejectedSyntax(String),
    /// A token was found but its public suffix is not registrable.
    RejectedSuffix(String),
    /// Line starts with '!' or '|': browser-syntax filter fed into a
    /// DNS-list pipeline. Not an error for the run, but worth a warning.
    FormatMismatch,
}

/// Line scanner producing at most one candidate domain per line.
pub struct Extractor {
    pattern: Regex,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(DOMAIN_PATTERN).context("Failed to compile domain pattern")?;
        Ok(Self { pattern })
    }

    /// Scan one raw line and produce zero or one candidate.
    pub fn extract(&self, line: &str) -> Extraction {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Extraction::Nothing;
        }
        if line.starts_with('!') || line.starts_with('|') {
            return Extraction::FormatMismatch;
        }

        let line = line.to_lowercase();
        let line = strip_loopback_prefix(&line);

        let Some(m) = self.pattern.find(line) else {
            return Extraction::Nothing;
        };
        let found = m.as_str();
        if found.len() <= 3 {
            return Extraction::Nothing;
        }

        if !passes_syntax(found) {
            return Extraction::RejectedSyntax(found.to_string());
        }
        if !has_registrable_suffix(found) {
            return Extraction::RejectedSuffix(found.to_string());
        }
        Extraction::Candidate(found.to_string())
    }
}

/// Drop a leading `0.0.0.0` or `127.0.0.1` hosts-file address plus the
/// separator that follows it.
fn strip_loopback_prefix(line: &str) -> &str {
    for prefix in ["0.0.0.0", "127.0.0.1"] {
        if let Some(rest) = line.strip_prefix(prefix) {
            // Only treat it as an address field when something separates it
            // from the domain; "0.0.0.0.example.com" must stay intact.
            if rest.is_empty() {
                return rest;
            }
            if rest.starts_with(' ') || rest.starts_with('\t') {
                return rest.trim_start_matches([' ', '\t']);
            }
        }
    }
    line
}

/// Syntax checks on a matched token: bounded length, dotted, no hosts-file
/// noise characters, not an IP literal.
fn passes_syntax(domain: &str) -> bool {
    domain.len() < 255
        && domain.contains('.')
        && !domain.contains(' ')
        && !domain.contains('#')
        && !domain.contains('*')
        && !domain.contains('!')
        && domain.parse::<IpAddr>().is_err()
}

/// Public-suffix check: accept ICANN-listed suffixes, or multi-label
/// suffixes from the private section of the list.
fn has_registrable_suffix(domain: &str) -> bool {
    match psl::suffix(domain.as_bytes()) {
        Some(suffix) => {
            matches!(suffix.typ(), Some(psl::Type::Icann))
                || suffix.as_bytes().contains(&b'.')
        }
        None => false,
    }
}
