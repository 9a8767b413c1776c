use std::collections::VecDeque;

use super::types::{ChannelTypes, LogReader, ReadError, Record};

/// In-memory record source
///
/// Delivers a prepared list of records in order. Useful for driving the
/// aggregation pipeline without a container on disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryReader {
    channels: ChannelTypes,
    records: VecDeque<Record>,
}

impl MemoryReader {
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            channels: ChannelTypes::new(),
            records: records.into_iter().collect(),
        }
    }

    /// Declare channel types reported by [`LogReader::list_channels`]
    pub fn with_channels(mut self, channels: ChannelTypes) -> Self {
        self.channels = channels;
        self
    }

    /// Records not yet read
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl LogReader for MemoryReader {
    fn list_channels(&self) -> &ChannelTypes {
        &self.channels
    }

    fn has_next(&mut self) -> bool {
        !self.records.is_empty()
    }

    fn read_next(&mut self) -> Result<Record, ReadError> {
        self.records.pop_front().ok_or(ReadError::Exhausted)
    }
}
