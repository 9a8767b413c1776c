//! MCAP storage files
//!
//! A rosbag2 bag stores its records in one or more MCAP files. Each file is
//! memory-mapped once and decoded lazily, one message at a time.

use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::types::{ChannelTypes, LogOpenError, LogReader, ReadError, Record};

/// File extension of MCAP storage files
pub const MCAP_EXTENSION: &str = "mcap";

/// A memory-mapped, validated MCAP storage file
pub struct StorageFile {
    path: PathBuf,
    mmap: Mmap,
    channels: ChannelTypes,
}

impl StorageFile {
    /// Map the file and validate it as an MCAP container
    pub fn open(path: &Path) -> Result<Self, LogOpenError> {
        let file = File::open(path).map_err(|source| LogOpenError::StorageIo {
            path: path.to_path_buf(),
            source,
        })?;

        // SAFETY: the log is closed before analysis; nothing truncates it while mapped.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| LogOpenError::StorageIo {
            path: path.to_path_buf(),
            source,
        })?;

        let container_error = |source| LogOpenError::Container {
            path: path.to_path_buf(),
            source,
        };

        // Constructing a stream checks the leading and trailing magic
        mcap::MessageStream::new(&mmap).map_err(container_error)?;
        let channels = summary_channel_types(&mmap).map_err(container_error)?;

        tracing::debug!(
            "Opened storage file {} ({} bytes, {} channels in summary)",
            path.display(),
            mmap.len(),
            channels.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            channels,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Channel types declared in the file's summary section, if it has one
    pub fn channel_types(&self) -> &ChannelTypes {
        &self.channels
    }

    pub fn reader(&self) -> Result<McapReader<'_>, LogOpenError> {
        let stream =
            mcap::MessageStream::new(&self.mmap).map_err(|source| LogOpenError::Container {
                path: self.path.clone(),
                source,
            })?;
        Ok(McapReader {
            stream,
            channels: &self.channels,
            pending: None,
            done: false,
        })
    }
}

fn summary_channel_types(buf: &[u8]) -> Result<ChannelTypes, mcap::McapError> {
    let mut types = ChannelTypes::new();
    if let Some(summary) = mcap::Summary::read(buf)? {
        for channel in summary.channels.values() {
            let type_name = channel
                .schema
                .as_ref()
                .map(|schema| schema.name.clone())
                .unwrap_or_default();
            types.insert(channel.topic.clone(), type_name);
        }
    }
    Ok(types)
}

/// Record reader over a single MCAP storage file, in file order
pub struct McapReader<'a> {
    stream: mcap::MessageStream<'a>,
    channels: &'a ChannelTypes,
    pending: Option<Result<Record, ReadError>>,
    done: bool,
}

impl McapReader<'_> {
    fn fill(&mut self) {
        if self.pending.is_some() || self.done {
            return;
        }
        match self.stream.next() {
            Some(Ok(message)) => self.pending = Some(to_record(message)),
            Some(Err(e)) => {
                // The stream cannot resynchronize after a bad record
                self.pending = Some(Err(ReadError::Decode(e)));
                self.done = true;
            }
            None => self.done = true,
        }
    }
}

impl LogReader for McapReader<'_> {
    fn list_channels(&self) -> &ChannelTypes {
        self.channels
    }

    fn has_next(&mut self) -> bool {
        self.fill();
        self.pending.is_some()
    }

    fn read_next(&mut self) -> Result<Record, ReadError> {
        self.fill();
        self.pending.take().unwrap_or(Err(ReadError::Exhausted))
    }
}

fn to_record(message: mcap::Message<'_>) -> Result<Record, ReadError> {
    let timestamp = i64::try_from(message.log_time)
        .map_err(|_| ReadError::TimestampOverflow(message.log_time))?;
    Ok(Record {
        channel: message.channel.topic.clone(),
        payload: message.data.into_owned(),
        timestamp,
    })
}

/// Whether a path names an MCAP file by extension
pub fn is_mcap_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MCAP_EXTENSION))
}
