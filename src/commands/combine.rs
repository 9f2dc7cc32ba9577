//! Combine command: merge the category lists into the combined artifacts.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::merger::{atomic_rewrite, merge, read_domain_lines};
use crate::overrides::DomainSet;
use crate::sources::Category;
use crate::writer::{write_filter_list, write_hosts_format};

/// Run the combine command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    let mut raw = Vec::new();
    for category in Category::ALL {
        raw.extend(read_domain_lines(&config.category_file(category)));
    }

    let exclusions = DomainSet::load(&config.exclusion_file);
    let inclusions = DomainSet::load(&config.inclusion_file);
    let (combined, outcome) = merge(
        raw,
        &exclusions,
        Some(&inclusions),
        config.subdomain_exclusion,
    );

    let mut content = String::with_capacity(combined.len() * 16);
    for domain in &combined {
        content.push_str(domain);
        content.push('\n');
    }
    atomic_rewrite(&config.combined_file(), &content)?;
    write_hosts_format(&combined, &config.hosts_format_file())?;
    write_filter_list(&combined, &config.filter_file(), &config.filter)?;

    info!(
        "Combined {} domains ({} included, {} excluded, {} duplicates dropped)",
        outcome.kept, outcome.included, outcome.excluded, outcome.duplicates
    );
    println!(
        "[OK] {} domains -> {:?}, {:?}, {:?}",
        outcome.kept,
        config.combined_file(),
        config.hosts_format_file(),
        config.filter_file()
    );
    Ok(())
}
