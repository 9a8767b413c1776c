pub mod bag;
pub mod memory;
pub mod metadata;
pub mod storage;
pub mod types;

pub use bag::{Bag, SequentialReader};
pub use memory::MemoryReader;
pub use metadata::BagMetadata;
pub use storage::{McapReader, StorageFile};
pub use types::{ChannelTypes, LogOpenError, LogReader, ReadError, Record, StorageId};
