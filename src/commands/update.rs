//! Update command: the fetch-extract-validate-merge pipeline.
//!
//! Phase 1 fetches every source, extracts candidates, and validates them
//! concurrently, appending survivors to the category files through
//! single-writer channels. Phase 2 starts only after every validation task
//! and writer has drained, because it reads the files phase 1 wrote.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::extractor::{Extraction, Extractor};
use crate::fetcher::Fetcher;
use crate::lock::LockGuard;
use crate::merger::finalize_list;
use crate::overrides::DomainSet;
use crate::sources::{dedup_sources, Category};
use crate::stats::{RunCounters, RunState, SourceStats};
use crate::validator::Validator;
use crate::writer::ListWriter;

/// One candidate awaiting validation. Seed-list entries carry no category
/// and land only in the combined list.
struct Job {
    domain: String,
    category: Option<Category>,
}

/// Run the update command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    config.validate()?;
    let _lock = LockGuard::acquire(&config.output_dir)?;

    // Full rebuild: each run owns its lists outright, so stale output goes
    // away before anything is fetched.
    for category in Category::ALL {
        remove_stale(&config.category_file(category));
    }
    if config.combined {
        remove_stale(&config.combined_file());
    }

    let exclusions = DomainSet::load(&config.exclusion_file);
    let counters = RunCounters::default();
    let extractor = Extractor::new()?;
    let fetcher = Fetcher::new(Duration::from_secs(config.fetch.timeout_secs))?;
    let validator = Arc::new(Validator::new(&config.validation)?);

    // Phase 1a: fetch and extract
    let sources = dedup_sources(&config.sources);
    info!("Fetching {} sources...", sources.len());
    let results = fetcher
        .fetch_sources(&sources, config.fetch.max_concurrent)
        .await;

    let mut jobs: Vec<Job> = Vec::new();
    let mut seen: HashSet<(Option<Category>, String)> = HashSet::new();
    let mut source_stats: Vec<SourceStats> = Vec::new();

    for result in &results {
        if result.failure.is_some() {
            RunCounters::bump(&counters.sources_failed);
        } else {
            RunCounters::bump(&counters.sources_fetched);
        }
        let mut candidates_here = 0usize;
        let mut format_warned = false;
        for line in &result.lines {
            RunCounters::bump(&counters.lines_scanned);
            match extractor.extract(line) {
                Extraction::Candidate(domain) => {
                    candidates_here += 1;
                    RunCounters::bump(&counters.candidates);
                    let key = (Some(result.source.category), domain.clone());
                    if seen.insert(key) {
                        jobs.push(Job {
                            domain,
                            category: Some(result.source.category),
                        });
                    } else {
                        RunCounters::bump(&counters.duplicates_skipped);
                    }
                }
                Extraction::Nothing => {}
                Extraction::RejectedSyntax(token) => {
                    RunCounters::bump(&counters.rejected_syntax);
                    debug!("Invalid domain syntax: {} ({})", token, result.source.url);
                }
                Extraction::RejectedSuffix(token) => {
                    RunCounters::bump(&counters.rejected_suffix);
                    debug!("Invalid domain suffix: {} ({})", token, result.source.url);
                }
                Extraction::FormatMismatch => {
                    if !format_warned {
                        warn!(
                            "{} looks like a browser-syntax filter list, not a DNS list",
                            result.source.url
                        );
                        format_warned = true;
                    }
                }
            }
        }
        source_stats.push(SourceStats {
            url: result.source.url.clone(),
            category: result.source.category.to_string(),
            candidates: candidates_here,
            failed: result.failure.is_some(),
        });
    }

    // Seed-list entries validate straight into the combined list.
    if config.combined {
        let seeds = DomainSet::load(&config.seed_file);
        for domain in seeds.iter() {
            if seen.insert((None, domain.to_string())) {
                jobs.push(Job {
                    domain: domain.to_string(),
                    category: None,
                });
            }
        }
    }

    info!("Validating {} candidate domains...", jobs.len());

    // One writer task per destination file
    let mut writers: HashMap<Category, ListWriter> = HashMap::new();
    for category in Category::ALL {
        writers.insert(
            category,
            ListWriter::create(&config.category_file(category)).await?,
        );
    }
    let combined_writer = if config.combined {
        Some(ListWriter::create(&config.combined_file()).await?)
    } else {
        None
    };

    // Phase 1b: bounded concurrent validation; survivors are appended the
    // moment their verdict lands, nothing buffers the full result set.
    let mut verdicts = stream::iter(jobs.into_iter().map(|job| {
        let validator = validator.clone();
        async move {
            let verdict = validator.validate(&job.domain).await;
            (job, verdict)
        }
    }))
    .buffer_unordered(config.validation.max_concurrent);

    while let Some((job, verdict)) = verdicts.next().await {
        if verdict.valid {
            RunCounters::bump(&counters.validated);
            if let Some(category) = job.category {
                if let Some(writer) = writers.get(&category) {
                    writer.append(&job.domain).await;
                }
            }
            if let Some(writer) = combined_writer.as_ref() {
                writer.append(&job.domain).await;
            }
        } else {
            RunCounters::bump(&counters.invalid);
        }
    }

    // Drain the writers. A write failure abandons that file; the siblings
    // continue.
    for (category, writer) in writers {
        match writer.finish().await {
            Ok(written) => debug!("{}: {} domains written", category, written),
            Err(e) => warn!("{}: {:#}", category, e),
        }
    }
    if let Some(writer) = combined_writer {
        if let Err(e) = writer.finish().await {
            warn!("combined: {:#}", e);
        }
    }

    // Phase 2: dedup, reconcile overrides, sort, atomic rewrite
    for category in Category::ALL {
        let path = config.category_file(category);
        match finalize_list(&path, &exclusions, None, config.subdomain_exclusion) {
            Ok(outcome) => info!(
                "{}: {} domains ({} excluded)",
                category, outcome.kept, outcome.excluded
            ),
            Err(e) => warn!("Failed to finalize {}: {:#}", category, e),
        }
    }
    if config.combined {
        let inclusions = DomainSet::load(&config.inclusion_file);
        match finalize_list(
            &config.combined_file(),
            &exclusions,
            Some(&inclusions),
            config.subdomain_exclusion,
        ) {
            Ok(outcome) => info!(
                "combined: {} domains ({} included, {} excluded)",
                outcome.kept, outcome.included, outcome.excluded
            ),
            Err(e) => warn!("Failed to finalize combined list: {:#}", e),
        }
    }

    // Users edit the override files by hand; rewrite them normalized.
    for path in [&config.exclusion_file, &config.inclusion_file] {
        if let Err(e) = DomainSet::normalize_file(path) {
            warn!("{:#}", e);
        }
    }

    let summary = counters.snapshot();
    let state = RunState {
        last_update: Some(chrono::Utc::now()),
        summary,
        sources: source_stats,
    };
    if let Err(e) = state.save(&config.state_file()) {
        warn!("Failed to save run state: {:#}", e);
    }

    summary.print();
    Ok(())
}

fn remove_stale(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to remove stale list {:?}: {}", path, e);
        }
    }
}
