//! Analysis module for bag log statistics.
//!
//! Records stream through an [`Aggregator`] exactly once. Its finalized
//! [`LogSummary`] holds only per-channel scalar accumulators, so memory use
//! depends on the number of channels, never on the size of the log.

pub mod aggregator;

pub use aggregator::{scan, scan_bag, timed_scan, Aggregator, ScanError};

use serde::Serialize;
use std::collections::HashMap;

/// Nanoseconds per second
pub const NANOS_PER_SEC: f64 = 1e9;

/// Running totals for one channel
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub channel: String,
    pub total_bytes: u64,
    pub message_count: u64,
}

impl ChannelStats {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            total_bytes: 0,
            message_count: 0,
        }
    }

    /// Account for one record of `size` bytes
    #[inline]
    pub fn add(&mut self, size: u64) {
        self.total_bytes += size;
        self.message_count += 1;
    }

    /// Fold in totals for the same channel from another segment
    pub fn absorb(&mut self, other: &ChannelStats) {
        self.total_bytes += other.total_bytes;
        self.message_count += other.message_count;
    }
}

/// Whether durations and rates can be derived from a summary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ScanStatus {
    /// No records were read
    Empty,
    /// Last record is not later than the first
    DegenerateDuration,
    Complete,
}

impl ScanStatus {
    pub fn has_duration(&self) -> bool {
        matches!(self, ScanStatus::Complete)
    }
}

/// Aggregated statistics for a whole log
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LogSummary {
    pub total_bytes: u64,
    pub message_count: u64,
    /// Timestamp of the first record read (ns)
    pub start_time: i64,
    /// Timestamp of the last record read (ns)
    pub end_time: i64,
    pub channels: HashMap<String, ChannelStats>,
}

impl LogSummary {
    pub fn status(&self) -> ScanStatus {
        if self.message_count == 0 {
            ScanStatus::Empty
        } else if self.end_time <= self.start_time {
            ScanStatus::DegenerateDuration
        } else {
            ScanStatus::Complete
        }
    }

    /// Seconds between first and last record; zero for empty or single-instant logs
    pub fn elapsed_secs(&self) -> f64 {
        if self.message_count == 0 {
            return 0.0;
        }
        // Widened so the full i64 timestamp range cannot overflow
        (i128::from(self.end_time) - i128::from(self.start_time)) as f64 / NANOS_PER_SEC
    }

    /// Duration usable as a rate denominator, `None` when undefined
    pub fn duration_secs(&self) -> Option<f64> {
        let secs = self.elapsed_secs();
        (self.status().has_duration() && secs > 0.0).then_some(secs)
    }

    /// Messages per second for `count` messages over the log duration
    pub fn rate_hz(&self, count: u64) -> Option<f64> {
        self.duration_secs().map(|secs| count as f64 / secs)
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelStats> {
        self.channels.get(name)
    }

    /// Combine with the summary of the segment recorded immediately after this one.
    ///
    /// Channel totals add up; the time span runs from the first record of the
    /// earlier non-empty segment to the last record of the later one.
    pub fn merge(mut self, later: LogSummary) -> LogSummary {
        if later.message_count == 0 {
            return self;
        }
        if self.message_count == 0 {
            return later;
        }

        self.end_time = later.end_time;
        self.total_bytes += later.total_bytes;
        self.message_count += later.message_count;
        for (name, stats) in later.channels {
            match self.channels.get_mut(&name) {
                Some(existing) => existing.absorb(&stats),
                None => {
                    self.channels.insert(name, stats);
                }
            }
        }
        self
    }
}
