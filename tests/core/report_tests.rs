//! Tests for report generation
//!
//! Tests cover:
//! - Sort order and deterministic tie-breaking
//! - Verbosity gating by size unit
//! - Summary line values and undefined-rate handling

use bagstat::analysis::{scan, LogSummary, ScanStatus};
use bagstat::parsers::{ChannelTypes, MemoryReader};
use bagstat::report::{Report, ReportOptions, SortKey};
use bagstat::units::SizeUnit;

use crate::common::float_cmp::{assert_approx_eq, DEFAULT_TOLERANCE};
use crate::common::synthetic::records;

fn summarize(spec: &[(&str, usize, i64)]) -> LogSummary {
    scan(&mut MemoryReader::new(records(spec))).unwrap()
}

fn verbose() -> ReportOptions {
    ReportOptions {
        verbose: true,
        ..Default::default()
    }
}

fn channel_order(report: &Report) -> Vec<String> {
    report.channels.iter().map(|r| r.channel.clone()).collect()
}

// ============================================
// End-to-End Scenario
// ============================================

#[test]
fn test_scenario_report() {
    let summary = summarize(&[("a", 100, 0), ("b", 200, 0), ("a", 100, 1_000_000_000)]);
    let report = Report::build(&summary, &ChannelTypes::new(), &verbose());

    assert_eq!(report.status, ScanStatus::Complete);
    assert_eq!(report.summary.total_bytes, 400);
    assert_eq!(report.summary.duration_secs, Some(1.0));
    assert_approx_eq(
        report.summary.throughput_mib_per_sec.unwrap(),
        0.000381,
        0.000001,
    );

    assert_eq!(channel_order(&report), vec!["a", "b"]);

    let a = &report.channels[0];
    assert_eq!(a.total_bytes, 200);
    assert_eq!(a.message_count, 2);
    assert_approx_eq(a.rate_hz.unwrap(), 2.0, DEFAULT_TOLERANCE);

    let b = &report.channels[1];
    assert_eq!(b.total_bytes, 200);
    assert_eq!(b.message_count, 1);
    assert_approx_eq(b.rate_hz.unwrap(), 1.0, DEFAULT_TOLERANCE);
}

#[test]
fn test_scenario_report_by_count() {
    let summary = summarize(&[("a", 100, 0), ("b", 200, 0), ("a", 100, 1_000_000_000)]);
    let options = ReportOptions {
        sort: SortKey::Count,
        verbose: true,
        ..Default::default()
    };
    let report = Report::build(&summary, &ChannelTypes::new(), &options);
    assert_eq!(channel_order(&report), vec!["a", "b"]);
}

// ============================================
// Sorting Tests
// ============================================

#[test]
fn test_tie_break_is_alphabetical_and_stable() {
    let spec = [
        ("/zeta", 64, 0),
        ("/alpha", 64, 1),
        ("/mid", 64, 2),
        ("/beta", 64, 3_000_000_000),
    ];
    let expected = vec!["/alpha", "/beta", "/mid", "/zeta"];

    for _ in 0..10 {
        let report = Report::build(&summarize(&spec), &ChannelTypes::new(), &verbose());
        assert_eq!(channel_order(&report), expected);
    }
}

#[test]
fn test_count_sort_differs_from_size_sort() {
    let summary = summarize(&[
        ("/big", 5000, 0),
        ("/chatty", 1, 1),
        ("/chatty", 1, 2),
        ("/chatty", 1, 3),
        ("/big", 5000, 1_000_000_000),
    ]);

    let by_size = Report::build(&summary, &ChannelTypes::new(), &verbose());
    assert_eq!(channel_order(&by_size), vec!["/big", "/chatty"]);

    let options = ReportOptions {
        sort: SortKey::Count,
        verbose: true,
        ..Default::default()
    };
    let by_count = Report::build(&summary, &ChannelTypes::new(), &options);
    assert_eq!(channel_order(&by_count), vec!["/chatty", "/big"]);
}

// ============================================
// Unit and Verbosity Tests
// ============================================

#[test]
fn test_unit_boundaries_in_rows() {
    let summary = summarize(&[("/kib", 1024, 0), ("/mib", 1_048_576, 1_000_000_000)]);
    let report = Report::build(&summary, &ChannelTypes::new(), &verbose());

    let mib = &report.channels[0];
    assert_eq!(mib.channel, "/mib");
    assert_eq!(mib.size.unit, SizeUnit::Mebibytes);
    assert_eq!(mib.size.display(), "1.00 MB");

    let kib = &report.channels[1];
    assert_eq!(kib.size.unit, SizeUnit::Kibibytes);
    assert_eq!(kib.size.display(), "1.00 KB");
}

#[test]
fn test_verbosity_gating() {
    let summary = summarize(&[("/small", 500, 0), ("/large", 2_000_000, 1_000_000_000)]);

    let quiet = Report::build(&summary, &ChannelTypes::new(), &ReportOptions::default());
    assert_eq!(channel_order(&quiet), vec!["/large"]);

    let loud = Report::build(&summary, &ChannelTypes::new(), &verbose());
    assert_eq!(channel_order(&loud), vec!["/large", "/small"]);
}

#[test]
fn test_summary_line_always_printed() {
    let summary = summarize(&[("/small", 10, 0), ("/small", 10, 1_000_000_000)]);
    let report = Report::build(&summary, &ChannelTypes::new(), &ReportOptions::default());

    let lines = report.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("MB in 1.00 secs"));
}

// ============================================
// Undefined Rate Tests
// ============================================

#[test]
fn test_single_record_report() {
    let summary = summarize(&[("a", 100, 123_456)]);
    let report = Report::build(&summary, &ChannelTypes::new(), &verbose());

    assert_eq!(report.status, ScanStatus::DegenerateDuration);
    assert_eq!(report.summary.total_bytes, 100);
    assert_eq!(report.summary.duration_secs, None);
    assert_eq!(report.summary.throughput_mib_per_sec, None);
    assert_eq!(report.channels[0].rate_hz, None);

    assert!(report.summary_line().contains("MB in n/a secs"));

    let text = report.to_string();
    assert!(text.contains("n/a"));
    assert!(!text.contains("NaN"));
    assert!(!text.contains("inf"));
}

#[test]
fn test_out_of_order_log_is_degenerate() {
    let summary = summarize(&[("a", 100, 2_000_000_000), ("b", 100, 1_000_000_000)]);
    let report = Report::build(&summary, &ChannelTypes::new(), &verbose());

    assert_eq!(report.status, ScanStatus::DegenerateDuration);
    assert_eq!(report.summary.duration_secs, None);
    assert!(report.channels.iter().all(|row| row.rate_hz.is_none()));
    assert!(report.summary_line().contains("in n/a secs"));
}

#[test]
fn test_empty_report() {
    let report = Report::build(&LogSummary::default(), &ChannelTypes::new(), &verbose());

    assert_eq!(report.status, ScanStatus::Empty);
    assert!(report.channels.is_empty());
    assert_eq!(report.summary.total_bytes, 0);
    assert_eq!(report.summary.elapsed_secs, 0.0);
    assert_eq!(
        report.summary_line(),
        "      0.00 MB in 0.00 secs,        n/a MB/s"
    );
}
