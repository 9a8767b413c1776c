//! Tests for streaming aggregation
//!
//! Tests cover:
//! - Sum, count and order invariants over synthetic logs
//! - Empty and single-instant logs
//! - Merging summaries of consecutive segments

use bagstat::analysis::{scan, Aggregator, LogSummary, ScanStatus};
use bagstat::parsers::MemoryReader;

use crate::common::assertions::assert_summary_matches;
use crate::common::float_cmp::{assert_approx_eq, DEFAULT_TOLERANCE};
use crate::common::synthetic::{interleaved, records};

// ============================================
// Invariant Tests
// ============================================

#[test]
fn test_sum_and_count_invariants() {
    let input = interleaved(&["/scan", "/odom", "/tf", "/camera"], 1000, 10_000_000);
    let mut reader = MemoryReader::new(input.clone());
    let summary = scan(&mut reader).unwrap();

    assert_summary_matches(&summary, &input);
    assert_eq!(summary.channels.len(), 4);
}

#[test]
fn test_order_invariant_with_interleaving() {
    let input = records(&[
        ("/b", 10, 5),
        ("/a", 20, 6),
        ("/c", 30, 6),
        ("/a", 40, 90),
        ("/b", 50, 100),
    ]);
    let mut reader = MemoryReader::new(input.clone());
    let summary = scan(&mut reader).unwrap();

    assert_eq!(summary.start_time, 5);
    assert_eq!(summary.end_time, 100);
    assert_summary_matches(&summary, &input);
}

#[test]
fn test_zero_length_payloads_still_count() {
    let input = records(&[("/empty", 0, 0), ("/empty", 0, 1)]);
    let mut reader = MemoryReader::new(input);
    let summary = scan(&mut reader).unwrap();

    let stats = summary.channel("/empty").unwrap();
    assert_eq!(stats.total_bytes, 0);
    assert_eq!(stats.message_count, 2);
}

// ============================================
// Edge Case Tests
// ============================================

#[test]
fn test_empty_log() {
    let mut reader = MemoryReader::new(vec![]);
    let summary = scan(&mut reader).unwrap();

    assert_eq!(summary.total_bytes, 0);
    assert!(summary.channels.is_empty());
    assert_eq!(summary.status(), ScanStatus::Empty);
    assert_eq!(summary.duration_secs(), None);
}

#[test]
fn test_single_record_log() {
    let t = 1_700_000_000_000_000_000;
    let mut reader = MemoryReader::new(records(&[("a", 100, t)]));
    let summary = scan(&mut reader).unwrap();

    assert_eq!(summary.total_bytes, 100);
    assert_eq!(summary.start_time, t);
    assert_eq!(summary.end_time, t);
    assert_eq!(summary.status(), ScanStatus::DegenerateDuration);
    assert_eq!(summary.duration_secs(), None);
    assert_eq!(summary.rate_hz(1), None);
}

#[test]
fn test_shared_timestamp_log() {
    let mut reader = MemoryReader::new(records(&[("a", 1, 7), ("b", 1, 7), ("c", 1, 7)]));
    let summary = scan(&mut reader).unwrap();
    assert_eq!(summary.status(), ScanStatus::DegenerateDuration);
}

#[test]
fn test_extreme_timestamps_do_not_overflow() {
    let mut reader = MemoryReader::new(records(&[("a", 1, i64::MIN), ("a", 1, i64::MAX)]));
    let summary = scan(&mut reader).unwrap();

    assert_eq!(summary.status(), ScanStatus::Complete);
    let secs = summary.duration_secs().expect("Duration should be defined");
    assert!(secs > 1.8e10);
    assert!(summary.rate_hz(2).unwrap() > 0.0);
}

#[test]
fn test_end_to_end_scenario_totals() {
    let mut reader = MemoryReader::new(records(&[
        ("a", 100, 0),
        ("b", 200, 0),
        ("a", 100, 1_000_000_000),
    ]));
    let summary = scan(&mut reader).unwrap();

    assert_eq!(summary.total_bytes, 400);
    assert_eq!(summary.duration_secs(), Some(1.0));

    let a = summary.channel("a").unwrap();
    assert_eq!((a.total_bytes, a.message_count), (200, 2));
    let b = summary.channel("b").unwrap();
    assert_eq!((b.total_bytes, b.message_count), (200, 1));

    assert_approx_eq(summary.rate_hz(a.message_count).unwrap(), 2.0, DEFAULT_TOLERANCE);
    assert_approx_eq(summary.rate_hz(b.message_count).unwrap(), 1.0, DEFAULT_TOLERANCE);
}

// ============================================
// Merge Tests
// ============================================

#[test]
fn test_split_scan_matches_whole_scan() {
    let input = interleaved(&["/x", "/y", "/z"], 300, 1_000);

    let whole = scan(&mut MemoryReader::new(input.clone())).unwrap();

    let merged = input
        .chunks(70)
        .map(|chunk| scan(&mut MemoryReader::new(chunk.to_vec())).unwrap())
        .fold(LogSummary::default(), LogSummary::merge);

    assert_eq!(merged, whole);
}

#[test]
fn test_merge_grouping_does_not_matter() {
    let input = interleaved(&["/x", "/y"], 90, 1_000);
    let parts: Vec<LogSummary> = input
        .chunks(30)
        .map(|chunk| scan(&mut MemoryReader::new(chunk.to_vec())).unwrap())
        .collect();

    let left = parts[0]
        .clone()
        .merge(parts[1].clone())
        .merge(parts[2].clone());
    let right = parts[0]
        .clone()
        .merge(parts[1].clone().merge(parts[2].clone()));

    assert_eq!(left, right);
}

#[test]
fn test_snapshot_then_finalize() {
    let input = records(&[("a", 10, 0), ("b", 20, 10), ("a", 30, 20)]);
    let mut aggregator = Aggregator::new();

    aggregator.ingest(&input[0]);
    aggregator.ingest(&input[1]);
    let partial = aggregator.snapshot();
    aggregator.ingest(&input[2]);
    let final_summary = aggregator.finalize();

    assert_eq!(partial.total_bytes, 30);
    assert_eq!(partial.end_time, 10);
    assert_summary_matches(&final_summary, &input);
}
