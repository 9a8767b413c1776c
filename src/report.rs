//! Report generation from a finalized [`LogSummary`].
//!
//! Channels are ordered by the selected metric, largest first, with ties
//! broken by channel name so output is reproducible. Small channels (byte and
//! kibibyte scale) are only listed in verbose mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, EnumString};

use crate::analysis::{ChannelStats, LogSummary, ScanStatus};
use crate::parsers::ChannelTypes;
use crate::units::{bytes_to_mib, format_optional, ScaledSize, SizeUnit};

/// Metric used to order channels
#[derive(
    AsRefStr, Clone, Copy, Debug, Default, EnumString, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Cumulative payload bytes
    #[default]
    Size,
    /// Number of messages
    Count,
}

impl SortKey {
    fn metric(&self, stats: &ChannelStats) -> u64 {
        match self {
            SortKey::Size => stats.total_bytes,
            SortKey::Count => stats.message_count,
        }
    }
}

/// Presentation options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub sort: SortKey,
    /// Include byte and kibibyte scale channels
    pub verbose: bool,
    /// Append each channel's declared type
    pub show_types: bool,
}

/// Whole-log totals printed before the channel breakdown
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryLine {
    pub total_bytes: u64,
    pub total_mib: f64,
    pub message_count: u64,
    /// Measured span between first and last record, zero when there is none
    pub elapsed_secs: f64,
    /// Span usable for rates; `None` when the log is empty or has no extent
    pub duration_secs: Option<f64>,
    pub throughput_mib_per_sec: Option<f64>,
}

/// One channel in the breakdown
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportRow {
    pub channel: String,
    pub total_bytes: u64,
    pub message_count: u64,
    pub size: ScaledSize,
    pub rate_hz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
}

/// Sorted, unit-scaled view of a log summary
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub status: ScanStatus,
    pub sort: SortKey,
    pub summary: SummaryLine,
    pub channels: Vec<ReportRow>,
    #[serde(skip)]
    show_types: bool,
}

/// Channels ordered by `key` descending, then by name ascending
pub fn sort_channels(summary: &LogSummary, key: SortKey) -> Vec<&ChannelStats> {
    let mut channels: Vec<&ChannelStats> = summary.channels.values().collect();
    channels.sort_by(|a, b| {
        key.metric(b)
            .cmp(&key.metric(a))
            .then_with(|| a.channel.cmp(&b.channel))
    });
    channels
}

impl Report {
    pub fn build(summary: &LogSummary, types: &ChannelTypes, options: &ReportOptions) -> Self {
        let duration_secs = summary.duration_secs();
        let total_mib = bytes_to_mib(summary.total_bytes);

        let channels = sort_channels(summary, options.sort)
            .into_iter()
            .filter_map(|stats| {
                let size = ScaledSize::from_bytes(stats.total_bytes);
                if !options.verbose && size.unit != SizeUnit::Mebibytes {
                    return None;
                }
                let channel_type = if options.show_types {
                    types.get(&stats.channel).filter(|t| !t.is_empty()).cloned()
                } else {
                    None
                };
                Some(ReportRow {
                    channel: stats.channel.clone(),
                    total_bytes: stats.total_bytes,
                    message_count: stats.message_count,
                    size,
                    rate_hz: summary.rate_hz(stats.message_count),
                    channel_type,
                })
            })
            .collect::<Vec<_>>();

        let status = summary.status();
        match status {
            ScanStatus::Empty => tracing::warn!("Log contains no records; rates are undefined"),
            ScanStatus::DegenerateDuration => {
                tracing::warn!("Log has no positive duration; rates are undefined")
            }
            ScanStatus::Complete => {}
        }

        Self {
            status,
            sort: options.sort,
            summary: SummaryLine {
                total_bytes: summary.total_bytes,
                total_mib,
                message_count: summary.message_count,
                elapsed_secs: summary.elapsed_secs(),
                duration_secs,
                throughput_mib_per_sec: duration_secs.map(|secs| total_mib / secs),
            },
            channels,
            show_types: options.show_types,
        }
    }

    /// Totals line; an empty log reports zero seconds, a degenerate one `n/a`
    pub fn summary_line(&self) -> String {
        let secs = match self.status {
            ScanStatus::DegenerateDuration => format_optional(None, 0),
            _ => format_optional(Some(self.summary.elapsed_secs), 0),
        };
        format!(
            "{:10.2} MB in {} secs, {} MB/s",
            self.summary.total_mib,
            secs,
            format_optional(self.summary.throughput_mib_per_sec, 10)
        )
    }

    fn row_line(&self, row: &ReportRow) -> String {
        let rate = match row.rate_hz {
            Some(_) => format!("{}Hz", format_optional(row.rate_hz, 8)),
            None => format_optional(None, 10),
        };
        let mut line = format!(
            "{:10.2} {:<2}\t{}\t{}",
            row.size.value,
            row.size.unit.symbol(),
            rate,
            row.channel
        );
        if self.show_types {
            line.push('\t');
            line.push_str(row.channel_type.as_deref().unwrap_or("-"));
        }
        line
    }

    /// Summary line followed by one line per listed channel
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.summary_line())
            .chain(self.channels.iter().map(|row| self.row_line(row)))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
