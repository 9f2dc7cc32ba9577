//! End-to-end tests for the extract -> write -> merge pipeline, without
//! touching the network: fetched lines are simulated and every candidate
//! is treated as validated.

use std::fs;
use tempfile::TempDir;

use hostsmith::extractor::{Extraction, Extractor};
use hostsmith::merger::{finalize_list, read_domain_lines};
use hostsmith::overrides::DomainSet;
use hostsmith::writer::{write_hosts_format, ListWriter};

const FETCHED_LINES: &[&str] = &[
    "# AdAway default blocklist",
    "",
    "0.0.0.0 ads.example.com",
    "0.0.0.0 tracker.example.org",
    "127.0.0.1\tmetrics.example.net",
    "doubleclick.example.com",
    "0.0.0.0 ads.example.com",
    "not a domain line",
    "invalid.notarealsuffix",
    "192.168.1.1",
];

fn extract_all(lines: &[&str]) -> Vec<String> {
    let extractor = Extractor::new().unwrap();
    lines
        .iter()
        .filter_map(|line| match extractor.extract(line) {
            Extraction::Candidate(domain) => Some(domain),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn pipeline_produces_sorted_unique_exclusion_free_list() {
    let dir = TempDir::new().unwrap();
    let list_path = dir.path().join("advertisement");
    let exclusion_path = dir.path().join("exclusion");
    fs::write(&exclusion_path, "tracker.example.org\n").unwrap();

    // Phase 1: extract candidates and append them through the writer, in
    // arrival order, duplicates included.
    let writer = ListWriter::create(&list_path).await.unwrap();
    for domain in extract_all(FETCHED_LINES) {
        writer.append(&domain).await;
    }
    let written = writer.finish().await.unwrap();
    assert_eq!(written, 5); // four distinct + one duplicate appended twice

    // Phase 2: merge.
    let exclusions = DomainSet::load(&exclusion_path);
    let outcome = finalize_list(&list_path, &exclusions, None, true).unwrap();
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.excluded, 1);

    let final_list = read_domain_lines(&list_path);
    assert_eq!(
        final_list,
        vec![
            "ads.example.com",
            "doubleclick.example.com",
            "metrics.example.net",
        ]
    );

    // Sorted, unique, exclusion-free.
    let mut sorted = final_list.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(final_list, sorted);
    assert!(!final_list.contains(&"tracker.example.org".to_string()));
}

#[tokio::test]
async fn merge_is_idempotent_with_no_new_fetches() {
    let dir = TempDir::new().unwrap();
    let list_path = dir.path().join("malicious");

    let writer = ListWriter::create(&list_path).await.unwrap();
    for domain in ["b.example.com", "a.example.com", "b.example.com"] {
        writer.append(domain).await;
    }
    writer.finish().await.unwrap();

    let exclusions = DomainSet::default();
    finalize_list(&list_path, &exclusions, None, true).unwrap();
    let first = fs::read(&list_path).unwrap();
    finalize_list(&list_path, &exclusions, None, true).unwrap();
    let second = fs::read(&list_path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn hosts_format_round_trips_the_sorted_sequence() {
    let dir = TempDir::new().unwrap();
    let hosts_path = dir.path().join("hosts.blocked");
    let domains: Vec<String> = vec![
        "a.example.com".to_string(),
        "b.example.net".to_string(),
        "c.example.org".to_string(),
    ];

    write_hosts_format(&domains, &hosts_path).unwrap();

    let recovered: Vec<String> = fs::read_to_string(&hosts_path)
        .unwrap()
        .lines()
        .map(|line| line.split_whitespace().nth(1).unwrap().to_string())
        .collect();
    assert_eq!(recovered, domains);
}

#[test]
fn inclusion_entries_survive_into_the_combined_list() {
    let dir = TempDir::new().unwrap();
    let list_path = dir.path().join("hosts");
    fs::write(&list_path, "ads.example.com\n").unwrap();
    let inclusion_path = dir.path().join("inclusion");
    fs::write(&inclusion_path, "unvalidated.example.org\n").unwrap();

    let inclusions = DomainSet::load(&inclusion_path);
    finalize_list(&list_path, &DomainSet::default(), Some(&inclusions), true).unwrap();

    let final_list = read_domain_lines(&list_path);
    assert!(final_list.contains(&"unvalidated.example.org".to_string()));
}

#[test]
fn subdomain_aware_exclusion_removes_child_domains() {
    let dir = TempDir::new().unwrap();
    let list_path = dir.path().join("hosts");
    fs::write(&list_path, "mail.example.com\nads.other.org\n").unwrap();
    let exclusion_path = dir.path().join("exclusion");
    fs::write(&exclusion_path, "example.com\n").unwrap();

    let exclusions = DomainSet::load(&exclusion_path);
    finalize_list(&list_path, &exclusions, None, true).unwrap();
    assert_eq!(read_domain_lines(&list_path), vec!["ads.other.org"]);
}

#[test]
fn override_files_are_normalized_after_a_run() {
    let dir = TempDir::new().unwrap();
    let exclusion_path = dir.path().join("exclusion");
    fs::write(
        &exclusion_path,
        "z.example.com\n# user note\na.example.com\nz.example.com\n",
    )
    .unwrap();

    DomainSet::normalize_file(&exclusion_path).unwrap();
    assert_eq!(
        fs::read_to_string(&exclusion_path).unwrap(),
        "a.example.com\nz.example.com\n"
    );
}
