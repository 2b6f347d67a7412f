use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::chunk::ChunkDataSource;

/// In-memory [`ChunkDataSource`] that counts fetches and refuses
/// ranges extending past its content.
pub struct MemoryChunkSource {
    content: Vec<u8>,
    fetch_count: AtomicUsize,
}

impl MemoryChunkSource {
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content,
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch` calls observed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChunkDataSource for MemoryChunkSource {
    async fn fetch(&self, start: u64, end: u64) -> Option<Vec<u8>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let start = start as usize;
        let end = end as usize;
        if end >= self.content.len() {
            return None;
        }
        Some(self.content[start..=end].to_vec())
    }
}
