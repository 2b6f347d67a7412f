use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A hit as returned by an archive index, before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    /// Article path within the archive, unique per archive.
    pub path: String,
    pub title: String,
    /// Fulltext match probability in `[0, 1]`, when the index
    /// provides one. Title index hits carry `None`.
    pub probability: Option<f64>,
    /// Snippet around the match, when the index provides one.
    pub snippet: Option<String>,
}

/// A ranked search result across archives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub zim_file_id: Uuid,
    pub title: String,
    pub path: String,
    /// Ranking score, lower is better.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The request was superseded by a newer query.
    #[error("search superseded by a newer query")]
    Cancelled,
    #[error("archive search failed: {0}")]
    Archive(String),
}
