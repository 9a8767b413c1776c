use std::collections::BTreeMap;
use std::path::PathBuf;
use strum::{AsRefStr, EnumString};
use thiserror::Error;

/// Channel name -> declared message type
pub type ChannelTypes = BTreeMap<String, String>;

/// One timestamped, channel-tagged payload read from a log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub channel: String,
    pub payload: Vec<u8>,
    /// Nanoseconds, non-decreasing within a well-formed log
    pub timestamp: i64,
}

impl Record {
    pub fn new(channel: impl Into<String>, payload: Vec<u8>, timestamp: i64) -> Self {
        Self {
            channel: channel.into(),
            payload,
            timestamp,
        }
    }

    /// Payload length in bytes
    #[inline]
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }
}

/// Storage backends a bag descriptor can name
#[derive(AsRefStr, Clone, Copy, Debug, EnumString, PartialEq, Eq, Default)]
pub enum StorageId {
    #[default]
    #[strum(serialize = "mcap")]
    Mcap,
    #[strum(serialize = "sqlite3")]
    Sqlite3,
}

impl StorageId {
    pub fn name(&self) -> &'static str {
        match self {
            StorageId::Mcap => "MCAP",
            StorageId::Sqlite3 => "SQLite3",
        }
    }

    /// Whether records can be read from this backend
    pub fn is_supported(&self) -> bool {
        matches!(self, StorageId::Mcap)
    }
}

/// Errors that prevent a log from being opened
#[derive(Debug, Error)]
pub enum LogOpenError {
    #[error("Log path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a bag directory or .mcap file: {}", .0.display())]
    UnrecognizedPath(PathBuf),

    #[error("Failed to read metadata descriptor {}", .path.display())]
    MetadataRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse metadata descriptor {}", .path.display())]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported storage identifier: {0}")]
    UnsupportedStorage(String),

    #[error("Compressed bags are not supported (compression mode {mode}, format {format})")]
    UnsupportedCompression { mode: String, format: String },

    #[error("Metadata descriptor lists no storage files")]
    NoStorageFiles,

    #[error("Failed to open storage file {}", .path.display())]
    StorageIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid MCAP container {}", .path.display())]
    Container {
        path: PathBuf,
        #[source]
        source: mcap::McapError,
    },
}

/// Errors raised while reading records from an opened log
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("No more records in log")]
    Exhausted,

    #[error("Failed to decode record")]
    Decode(#[from] mcap::McapError),

    #[error("Record timestamp {0} does not fit a signed 64-bit nanosecond value")]
    TimestampOverflow(u64),
}

/// Sequential, exactly-once record source
///
/// Records are delivered in file order. Callers check [`LogReader::has_next`]
/// before each [`LogReader::read_next`]; reading past the end yields
/// [`ReadError::Exhausted`].
pub trait LogReader {
    /// Channels declared by the log, with their message types
    fn list_channels(&self) -> &ChannelTypes;

    fn has_next(&mut self) -> bool;

    fn read_next(&mut self) -> Result<Record, ReadError>;
}
