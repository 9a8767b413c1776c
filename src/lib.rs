//! bagstat - per-topic size and rate statistics for recorded ROS 2 bags
//!
//! A bag is scanned once, in file order. Each record's payload size is added
//! to its channel's running totals, and the finalized totals are reported
//! sorted by size or message count with throughput figures.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Bag opening, `metadata.yaml` parsing and MCAP record readers
//! - [`analysis`] - Streaming aggregation of records into a log summary
//! - [`report`] - Sorting, unit scaling and formatting of summaries
//! - [`units`] - Size units and number formatting
//! - [`settings`] - User settings persistence

pub mod analysis;
pub mod parsers;
pub mod report;
pub mod settings;
pub mod units;
