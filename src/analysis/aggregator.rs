//! Single-pass streaming reduction of records into a [`LogSummary`].

use rayon::prelude::*;
use std::time::Instant;
use thiserror::Error;

use super::{ChannelStats, LogSummary};
use crate::parsers::{Bag, LogOpenError, LogReader, ReadError, Record};

/// Emit a progress line every this many records
const PROGRESS_INTERVAL: u64 = 100_000;

/// Errors that abort a scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Open(#[from] LogOpenError),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Accumulates per-channel totals over an ordered record stream
#[derive(Debug, Default)]
pub struct Aggregator {
    summary: LogSummary,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, record: &Record) {
        let size = record.size();
        let summary = &mut self.summary;

        match summary.channels.get_mut(record.channel.as_str()) {
            Some(stats) => stats.add(size),
            None => {
                let mut stats = ChannelStats::new(record.channel.as_str());
                stats.add(size);
                summary.channels.insert(record.channel.clone(), stats);
            }
        }

        if summary.message_count == 0 {
            summary.start_time = record.timestamp;
        }
        summary.end_time = record.timestamp;
        summary.total_bytes += size;
        summary.message_count += 1;
    }

    pub fn records_seen(&self) -> u64 {
        self.summary.message_count
    }

    /// Copy of the totals so far.
    ///
    /// Partial until the input is exhausted: `end_time` is the latest record
    /// seen, not the end of the log.
    pub fn snapshot(&self) -> LogSummary {
        self.summary.clone()
    }

    pub fn finalize(self) -> LogSummary {
        self.summary
    }
}

/// Drain `reader` into a finalized summary
pub fn scan<R: LogReader + ?Sized>(reader: &mut R) -> Result<LogSummary, ReadError> {
    let mut aggregator = Aggregator::new();

    while reader.has_next() {
        let record = reader.read_next()?;
        aggregator.ingest(&record);

        if aggregator.records_seen() % PROGRESS_INTERVAL == 0 {
            tracing::debug!(
                "Scanned {} records, {} bytes so far",
                aggregator.records_seen(),
                aggregator.summary.total_bytes
            );
        }
    }

    Ok(aggregator.finalize())
}

/// Scan every storage file of a bag.
///
/// Split bags are scanned one file per task and merged back in recording
/// order, so the first and last timestamps still follow file order.
pub fn scan_bag(bag: &Bag) -> Result<LogSummary, ScanError> {
    if bag.files().len() <= 1 {
        let mut reader = bag.reader()?;
        return Ok(scan(&mut reader)?);
    }

    let summaries = bag
        .files()
        .par_iter()
        .map(|file| -> Result<LogSummary, ScanError> {
            let mut reader = file.reader()?;
            let summary = scan(&mut reader)?;
            tracing::debug!(
                "Scanned {}: {} records",
                file.path().display(),
                summary.message_count
            );
            Ok(summary)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(summaries
        .into_iter()
        .fold(LogSummary::default(), LogSummary::merge))
}

/// Run [`scan_bag`] and log how long it took
pub fn timed_scan(bag: &Bag) -> Result<LogSummary, ScanError> {
    let start = Instant::now();
    let summary = scan_bag(bag)?;
    tracing::info!(
        "Scanned {} records on {} channels in {} ms",
        summary.message_count,
        summary.channels.len(),
        start.elapsed().as_millis()
    );
    Ok(summary)
}
