use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::feed::ZimFileMetadata;

/// Well-known catalog categories. Anything unrecognized folds into
/// [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Wikipedia,
    Wikibooks,
    Wikinews,
    Wikiquote,
    Wikisource,
    Wikiversity,
    Wikivoyage,
    Wiktionary,
    Vikidia,
    Ted,
    StackExchange,
    Gutenberg,
    Phet,
    Other,
}

impl Category {
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "wikipedia" => Self::Wikipedia,
            "wikibooks" => Self::Wikibooks,
            "wikinews" => Self::Wikinews,
            "wikiquote" => Self::Wikiquote,
            "wikisource" => Self::Wikisource,
            "wikiversity" => Self::Wikiversity,
            "wikivoyage" => Self::Wikivoyage,
            "wiktionary" => Self::Wiktionary,
            "vikidia" => Self::Vikidia,
            "ted" => Self::Ted,
            "stack_exchange" | "stackexchange" => Self::StackExchange,
            "gutenberg" => Self::Gutenberg,
            "phet" => Self::Phet,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wikipedia => "wikipedia",
            Self::Wikibooks => "wikibooks",
            Self::Wikinews => "wikinews",
            Self::Wikiquote => "wikiquote",
            Self::Wikisource => "wikisource",
            Self::Wikiversity => "wikiversity",
            Self::Wikivoyage => "wikivoyage",
            Self::Wiktionary => "wiktionary",
            Self::Vikidia => "vikidia",
            Self::Ted => "ted",
            Self::StackExchange => "stack_exchange",
            Self::Gutenberg => "gutenberg",
            Self::Phet => "phet",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry as persisted locally, catalog metadata plus the
/// local download state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZimFileRecord {
    pub file_id: Uuid,
    pub group_identifier: String,
    pub title: String,
    pub description: String,
    pub language_codes: String,
    pub category: String,
    pub created: Option<DateTime<Utc>>,
    pub size: u64,
    pub article_count: u64,
    pub media_count: u64,
    pub creator: String,
    pub publisher: String,
    pub download_url: Option<String>,
    pub favicon_url: Option<String>,
    pub flavor: Option<String>,
    pub has_details: bool,
    pub has_pictures: bool,
    pub has_videos: bool,
    pub requires_service_workers: bool,
    /// Bookmark to a locally downloaded copy. A record with a bookmark
    /// is never deleted by catalog reconciliation.
    pub file_url_bookmark: Option<String>,
    pub included_in_search: bool,
    pub is_missing: bool,
}

impl ZimFileRecord {
    pub fn from_metadata(metadata: &ZimFileMetadata) -> Self {
        Self {
            file_id: metadata.file_id,
            group_identifier: metadata.group_identifier.clone(),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            language_codes: metadata.language_codes.clone(),
            category: metadata.category.clone(),
            created: metadata.created,
            size: metadata.size,
            article_count: metadata.article_count,
            media_count: metadata.media_count,
            creator: metadata.creator.clone(),
            publisher: metadata.publisher.clone(),
            download_url: metadata.download_url.clone(),
            favicon_url: metadata.favicon_url.clone(),
            flavor: metadata.flavor.clone(),
            has_details: metadata.has_details,
            has_pictures: metadata.has_pictures,
            has_videos: metadata.has_videos,
            requires_service_workers: metadata.requires_service_workers,
            file_url_bookmark: None,
            included_in_search: true,
            is_missing: false,
        }
    }
}

/// Refresh lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryState {
    /// No refresh has run yet in this process.
    Initial,
    /// A refresh is currently running.
    InProgress,
    /// The last refresh finished successfully.
    Complete,
    /// The last refresh failed; see the stored error.
    Error,
}

#[derive(Debug, Clone, Error)]
pub enum LibraryError {
    #[error("Error retrieving library data. {message}")]
    Retrieval {
        status: Option<u16>,
        message: String,
    },
    #[error("Error parsing library data. {0}")]
    Parse(String),
    #[error("Error processing library data. {0}")]
    Process(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in [
            Category::Wikipedia,
            Category::StackExchange,
            Category::Ted,
            Category::Other,
        ] {
            assert_eq!(Category::from_tag(category.as_str()), category);
        }
    }

    #[test]
    fn test_unknown_category_is_other() {
        assert_eq!(Category::from_tag("mystery"), Category::Other);
        assert_eq!(Category::from_tag(""), Category::Other);
    }

    #[test]
    fn test_retrieval_error_display() {
        let error = LibraryError::Retrieval {
            status: Some(404),
            message: "HTTP Status 404.".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Error retrieving library data. HTTP Status 404."
        );
    }
}
