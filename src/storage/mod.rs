pub mod base;
pub mod disk;
pub mod memory;

pub use base::{MeetingSink, StorageError};
pub use disk::DiskStorage;
pub use memory::MemoryStorage;
