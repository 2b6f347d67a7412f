use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::search::{ArchiveSearcher, RawHit, SearchError};

/// Scripted [`ArchiveSearcher`] with per-archive canned hits, an
/// optional artificial delay and recorded queries.
#[derive(Debug, Default)]
pub struct MockArchiveSearcher {
    title_hits: Mutex<HashMap<Uuid, Vec<RawHit>>>,
    index_hits: Mutex<HashMap<Uuid, Vec<RawHit>>>,
    failing: Mutex<HashSet<Uuid>>,
    queries: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
}

impl MockArchiveSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title_hits(&self, archive_id: Uuid, hits: Vec<RawHit>) {
        self.title_hits.lock().unwrap().insert(archive_id, hits);
    }

    pub fn set_index_hits(&self, archive_id: Uuid, hits: Vec<RawHit>) {
        self.index_hits.lock().unwrap().insert(archive_id, hits);
    }

    /// Make every lookup against `archive_id` fail.
    pub fn fail_archive(&self, archive_id: Uuid) {
        self.failing.lock().unwrap().insert(archive_id);
    }

    /// Delay every lookup, to exercise cancellation.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Queries observed by title lookups, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    async fn lookup(
        &self,
        hits: &Mutex<HashMap<Uuid, Vec<RawHit>>>,
        archive_id: &Uuid,
    ) -> Result<Vec<RawHit>, SearchError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(archive_id) {
            return Err(SearchError::Archive("scripted failure".to_string()));
        }
        Ok(hits
            .lock()
            .unwrap()
            .get(archive_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ArchiveSearcher for MockArchiveSearcher {
    async fn title_hits(
        &self,
        archive_id: &Uuid,
        query: &str,
        _limit: usize,
    ) -> Result<Vec<RawHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.lookup(&self.title_hits, archive_id).await
    }

    async fn index_hits(
        &self,
        archive_id: &Uuid,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<RawHit>, SearchError> {
        self.lookup(&self.index_hits, archive_id).await
    }
}
