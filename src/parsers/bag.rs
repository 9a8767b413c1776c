//! Bag handle: locates, validates and opens a log container.
//!
//! Two layouts are accepted:
//! - a rosbag2 directory holding `metadata.yaml` and its storage files
//! - a bare `.mcap` file

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::metadata::BagMetadata;
use super::storage::{is_mcap_path, McapReader, StorageFile};
use super::types::{ChannelTypes, LogOpenError, LogReader, ReadError, Record};

/// An opened log container
///
/// Storage files stay mapped for the lifetime of the handle and are released
/// when it is dropped or [`Bag::close`]d.
pub struct Bag {
    path: PathBuf,
    metadata: Option<BagMetadata>,
    files: Vec<StorageFile>,
    channels: ChannelTypes,
}

impl Bag {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogOpenError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LogOpenError::NotFound(path.to_path_buf()));
        }

        if path.is_dir() {
            Self::open_directory(path)
        } else if is_mcap_path(path) {
            let file = StorageFile::open(path)?;
            let channels = file.channel_types().clone();
            tracing::info!("Opened MCAP file {}", path.display());
            Ok(Self {
                path: path.to_path_buf(),
                metadata: None,
                files: vec![file],
                channels,
            })
        } else {
            Err(LogOpenError::UnrecognizedPath(path.to_path_buf()))
        }
    }

    fn open_directory(dir: &Path) -> Result<Self, LogOpenError> {
        let metadata = BagMetadata::load(dir)?;
        let storage = metadata.storage()?;
        metadata.check_compression()?;

        if metadata.relative_file_paths.is_empty() {
            return Err(LogOpenError::NoStorageFiles);
        }

        let files = metadata
            .relative_file_paths
            .iter()
            .map(|relative| StorageFile::open(&resolve_storage_path(dir, relative)))
            .collect::<Result<Vec<_>, _>>()?;

        // Descriptor types win; summaries fill in what the descriptor omits
        let mut channels = metadata.channel_types();
        for file in &files {
            for (topic, type_name) in file.channel_types() {
                let entry = channels.entry(topic.clone()).or_default();
                if entry.is_empty() {
                    entry.clone_from(type_name);
                }
            }
        }

        tracing::info!(
            "Opened {} bag {} with {} storage file(s), {} channels",
            storage.name(),
            dir.display(),
            files.len(),
            channels.len()
        );

        Ok(Self {
            path: dir.to_path_buf(),
            metadata: Some(metadata),
            files,
            channels,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed descriptor, absent for bare `.mcap` files
    pub fn metadata(&self) -> Option<&BagMetadata> {
        self.metadata.as_ref()
    }

    /// Storage files in recording order
    pub fn files(&self) -> &[StorageFile] {
        &self.files
    }

    /// Channel name -> declared type
    pub fn list_channels(&self) -> &ChannelTypes {
        &self.channels
    }

    /// Reader over every storage file, in recording order
    pub fn reader(&self) -> Result<SequentialReader<'_>, LogOpenError> {
        let readers = self
            .files
            .iter()
            .map(StorageFile::reader)
            .collect::<Result<VecDeque<_>, _>>()?;
        Ok(SequentialReader {
            channels: &self.channels,
            readers,
        })
    }

    /// Release the storage files
    pub fn close(self) {
        tracing::debug!("Closing bag {}", self.path.display());
    }
}

/// Older rosbag2 releases prefix relative paths with the bag directory name
fn resolve_storage_path(dir: &Path, relative: &str) -> PathBuf {
    let direct = dir.join(relative);
    if direct.exists() {
        return direct;
    }
    match Path::new(relative).file_name() {
        Some(name) if dir.join(name).exists() => dir.join(name),
        _ => direct,
    }
}

/// Reader chaining the storage files of a bag
pub struct SequentialReader<'a> {
    channels: &'a ChannelTypes,
    readers: VecDeque<McapReader<'a>>,
}

impl LogReader for SequentialReader<'_> {
    fn list_channels(&self) -> &ChannelTypes {
        self.channels
    }

    fn has_next(&mut self) -> bool {
        while let Some(reader) = self.readers.front_mut() {
            if reader.has_next() {
                return true;
            }
            self.readers.pop_front();
        }
        false
    }

    fn read_next(&mut self) -> Result<Record, ReadError> {
        if !self.has_next() {
            return Err(ReadError::Exhausted);
        }
        match self.readers.front_mut() {
            Some(reader) => reader.read_next(),
            None => Err(ReadError::Exhausted),
        }
    }
}
