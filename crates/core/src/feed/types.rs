use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One catalog entry describing a published ZIM archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZimFileMetadata {
    /// Stable file identifier, parsed from the entry's `urn:uuid:` id.
    pub file_id: Uuid,
    /// Book group identifier, e.g. "wikipedia_en_top".
    pub group_identifier: String,
    /// Human readable title.
    pub title: String,
    /// Entry summary text.
    pub description: String,
    /// Comma separated alpha-3 language codes as published.
    pub language_codes: String,
    /// Lowercased category, from the `_category:` tag or the category
    /// element, defaulting to "other".
    pub category: String,
    /// Publication timestamp, when the feed carries a parseable one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Download size in bytes, from the acquisition link length.
    pub size: u64,
    /// Number of articles in the archive.
    pub article_count: u64,
    /// Number of media items in the archive.
    pub media_count: u64,
    /// Content creator, from the author element.
    pub creator: String,
    /// Publisher name.
    pub publisher: String,
    /// Open-access acquisition URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Resolved thumbnail illustration URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    /// Build flavor, e.g. "maxi" or "nopic".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// Whether the archive includes article detail pages.
    pub has_details: bool,
    /// Whether the archive includes pictures.
    pub has_pictures: bool,
    /// Whether the archive includes videos.
    pub has_videos: bool,
    /// Whether the content needs service workers to render.
    pub requires_service_workers: bool,
}

#[derive(Debug, Error)]
pub enum FeedError {
    /// The response body is not valid UTF-8.
    #[error("feed data is not valid UTF-8: {0}")]
    Decode(String),
    /// The body is UTF-8 but not a well-formed feed document.
    #[error("invalid feed document: {0}")]
    Parse(String),
}
