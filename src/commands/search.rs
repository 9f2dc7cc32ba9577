//! Search command: find a domain across the local lists.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::merger::read_domain_lines;
use crate::sources::Category;

/// Run the search command
pub async fn run(term: &str, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let term = term.to_lowercase();

    let mut targets: Vec<PathBuf> = Category::ALL
        .iter()
        .map(|c| config.category_file(*c))
        .collect();
    targets.push(config.combined_file());
    targets.push(config.exclusion_file.clone());
    targets.push(config.inclusion_file.clone());

    let mut matches = 0usize;
    for path in &targets {
        if !path.exists() {
            continue;
        }
        for domain in search_file(path, &term) {
            println!("Found domain: {} ({})", domain, path.display());
            matches += 1;
        }
    }

    if matches == 0 {
        println!("No matches for '{}'", term);
    } else {
        println!();
        println!("{} match(es) for '{}'", matches, term);
    }
    Ok(())
}

fn search_file(path: &Path, term: &str) -> Vec<String> {
    read_domain_lines(path)
        .into_iter()
        .filter(|domain| domain.contains(term))
        .collect()
}
