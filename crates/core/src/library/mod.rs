//! Local library catalog: persistence, feed fetching and refresh.

mod fetcher;
mod refresher;
mod sqlite;
mod types;

pub use fetcher::{FeedFetcher, FetchOutcome, HttpFeedFetcher};
pub use refresher::LibraryRefresher;
pub use sqlite::SqliteLibraryStore;
pub use types::*;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::feed::ZimFileMetadata;

/// Persistent store for catalog records and the category index.
pub trait LibraryStore: Send + Sync {
    /// Ids of every stored record.
    fn zim_file_ids(&self) -> Result<HashSet<Uuid>, StoreError>;

    fn get_zim_file(&self, id: &Uuid) -> Result<Option<ZimFileRecord>, StoreError>;

    /// Insert new records; ids already present are left untouched.
    /// Returns the number of rows actually inserted.
    fn bulk_insert(&self, metadata: &[ZimFileMetadata]) -> Result<u32, StoreError>;

    /// Delete records not in `keep`, except those with a local file
    /// bookmark. Returns the number of rows deleted.
    fn bulk_delete_not_downloaded(&self, keep: &HashSet<Uuid>) -> Result<u32, StoreError>;

    /// Delete every record without a local file bookmark.
    fn delete_all_not_downloaded(&self) -> Result<u32, StoreError>;

    /// Distinct (category, language_codes) pairs over all records.
    fn category_language_projections(&self) -> Result<Vec<(String, String)>, StoreError>;

    /// Replace the persisted category to languages index.
    fn save_category_languages(
        &self,
        index: &HashMap<Category, HashSet<String>>,
    ) -> Result<(), StoreError>;

    fn category_languages(&self) -> Result<HashMap<Category, HashSet<String>>, StoreError>;

    /// Per-language record counts, as (language_codes, count) pairs.
    fn language_counts(&self) -> Result<Vec<(String, u32)>, StoreError>;
}

/// User preferences backing the refresh flow.
///
/// Infallible by design: implementations should log storage problems
/// and fall back to defaults rather than surface errors here.
pub trait Preferences: Send + Sync {
    fn last_refresh(&self) -> Option<DateTime<Utc>>;
    fn set_last_refresh(&self, at: DateTime<Utc>);

    fn etag(&self) -> Option<String>;
    fn set_etag(&self, etag: Option<&str>);

    fn auto_refresh(&self) -> bool;
    fn set_auto_refresh(&self, enabled: bool);

    fn language_codes(&self) -> HashSet<String>;
    fn set_language_codes(&self, codes: &HashSet<String>);

    fn using_old_language_codes(&self) -> bool;
    fn set_using_old_language_codes(&self, value: bool);
}
