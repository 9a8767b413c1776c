//! rosbag2 `metadata.yaml` descriptor
//!
//! Only the fields needed to locate storage files and name channel types are
//! modeled; everything else in the descriptor is ignored.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use super::types::{ChannelTypes, LogOpenError, StorageId};

/// Descriptor file name inside a bag directory
pub const METADATA_FILE: &str = "metadata.yaml";

#[derive(Debug, Clone, Deserialize)]
struct MetadataFile {
    rosbag2_bagfile_information: BagMetadata,
}

/// Contents of `rosbag2_bagfile_information`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BagMetadata {
    #[serde(default)]
    pub version: u32,
    pub storage_identifier: String,
    #[serde(default)]
    pub duration: Option<Nanoseconds>,
    #[serde(default)]
    pub starting_time: Option<StartingTime>,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub topics_with_message_count: Vec<TopicWithMessageCount>,
    #[serde(default)]
    pub compression_format: String,
    #[serde(default)]
    pub compression_mode: String,
    #[serde(default)]
    pub relative_file_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct Nanoseconds {
    pub nanoseconds: i64,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct StartingTime {
    pub nanoseconds_since_epoch: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicWithMessageCount {
    pub topic_metadata: TopicMetadata,
    #[serde(default)]
    pub message_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicMetadata {
    pub name: String,
    pub r#type: String,
    #[serde(default)]
    pub serialization_format: String,
}

impl BagMetadata {
    /// Parse descriptor text; `path` is only used for error reporting
    pub fn parse(contents: &str, path: &Path) -> Result<Self, LogOpenError> {
        let file: MetadataFile =
            serde_yaml::from_str(contents).map_err(|source| LogOpenError::MetadataParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(file.rosbag2_bagfile_information)
    }

    /// Read and parse `metadata.yaml` from a bag directory
    pub fn load(bag_dir: &Path) -> Result<Self, LogOpenError> {
        let path = bag_dir.join(METADATA_FILE);
        let contents =
            std::fs::read_to_string(&path).map_err(|source| LogOpenError::MetadataRead {
                path: path.clone(),
                source,
            })?;
        Self::parse(&contents, &path)
    }

    /// Resolve the storage backend, rejecting ones this crate cannot read
    pub fn storage(&self) -> Result<StorageId, LogOpenError> {
        match StorageId::from_str(&self.storage_identifier) {
            Ok(id) if id.is_supported() => Ok(id),
            _ => Err(LogOpenError::UnsupportedStorage(
                self.storage_identifier.clone(),
            )),
        }
    }

    /// File-level compression wraps whole storage files and cannot be memory-mapped.
    /// Message-level compression lives inside MCAP chunks and is handled by the reader.
    pub fn check_compression(&self) -> Result<(), LogOpenError> {
        if self.compression_mode.eq_ignore_ascii_case("file") {
            return Err(LogOpenError::UnsupportedCompression {
                mode: self.compression_mode.clone(),
                format: self.compression_format.clone(),
            });
        }
        Ok(())
    }

    pub fn channel_types(&self) -> ChannelTypes {
        self.topics_with_message_count
            .iter()
            .map(|t| (t.topic_metadata.name.clone(), t.topic_metadata.r#type.clone()))
            .collect()
    }
}
