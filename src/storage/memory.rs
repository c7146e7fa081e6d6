use super::base::{MeetingSink, StorageError};
use crate::meeting::Meeting;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// Keeps stored meetings in memory; cloned handles share the same buffer.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<Vec<(String, Meeting)>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meetings(&self) -> Vec<Meeting> {
        self.items.read().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn meetings_for(&self, spider: &str) -> Vec<Meeting> {
        self.items
            .read()
            .iter()
            .filter(|(s, _)| s == spider)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl MeetingSink for MemoryStorage {
    async fn store(&self, spider: &str, meeting: &Meeting) -> Result<(), StorageError> {
        self.items
            .write()
            .push((spider.to_string(), meeting.clone()));
        Ok(())
    }
}
