//! Multi-archive search with title-first deduplication and
//! distance-based ranking.

mod engine;
mod levenshtein;
mod types;

pub use engine::SearchEngine;
pub use levenshtein::Levenshtein;
pub use types::*;

use async_trait::async_trait;
use uuid::Uuid;

/// Queries a single ZIM archive's title and fulltext indices.
#[async_trait]
pub trait ArchiveSearcher: Send + Sync {
    /// Hits from the archive's title index.
    async fn title_hits(
        &self,
        archive_id: &Uuid,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawHit>, SearchError>;

    /// Hits from the archive's fulltext index.
    async fn index_hits(
        &self,
        archive_id: &Uuid,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawHit>, SearchError>;
}
