use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;
use uuid::Uuid;

use super::types::{Category, StoreError, ZimFileRecord};
use super::{LibraryStore, Preferences};
use crate::feed::ZimFileMetadata;
use crate::migration::FlagStore;

/// Sqlite-backed store for catalog records, the category index and
/// user preferences.
pub struct SqliteLibraryStore {
    conn: Mutex<Connection>,
}

impl SqliteLibraryStore {
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store, used by tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS zim_files (
                file_id TEXT PRIMARY KEY,
                group_identifier TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                language_codes TEXT NOT NULL,
                category TEXT NOT NULL,
                created TEXT,
                size INTEGER NOT NULL,
                article_count INTEGER NOT NULL,
                media_count INTEGER NOT NULL,
                creator TEXT NOT NULL,
                publisher TEXT NOT NULL,
                download_url TEXT,
                favicon_url TEXT,
                flavor TEXT,
                has_details INTEGER NOT NULL,
                has_pictures INTEGER NOT NULL,
                has_videos INTEGER NOT NULL,
                requires_service_workers INTEGER NOT NULL,
                file_url_bookmark TEXT,
                included_in_search INTEGER NOT NULL DEFAULT 1,
                is_missing INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_zim_files_category ON zim_files(category);
            CREATE TABLE IF NOT EXISTS category_languages (
                category TEXT NOT NULL,
                language TEXT NOT NULL,
                UNIQUE(category, language)
            );
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn get_pref(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            warn!(key, error = %e, "Failed to read preference");
            None
        })
    }

    fn set_pref(&self, key: &str, value: &str) {
        let conn = self.conn.lock().unwrap();
        if let Err(e) = conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        ) {
            warn!(key, error = %e, "Failed to write preference");
        }
    }

    fn delete_pref(&self, key: &str) {
        let conn = self.conn.lock().unwrap();
        if let Err(e) = conn.execute("DELETE FROM preferences WHERE key = ?1", params![key]) {
            warn!(key, error = %e, "Failed to delete preference");
        }
    }
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ZimFileRecord> {
    let file_id: String = row.get("file_id")?;
    let created: Option<String> = row.get("created")?;
    Ok(ZimFileRecord {
        file_id: Uuid::parse_str(&file_id).unwrap_or_else(|_| Uuid::nil()),
        group_identifier: row.get("group_identifier")?,
        title: row.get("title")?,
        description: row.get("description")?,
        language_codes: row.get("language_codes")?,
        category: row.get("category")?,
        created: created
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        size: row.get::<_, i64>("size")? as u64,
        article_count: row.get::<_, i64>("article_count")? as u64,
        media_count: row.get::<_, i64>("media_count")? as u64,
        creator: row.get("creator")?,
        publisher: row.get("publisher")?,
        download_url: row.get("download_url")?,
        favicon_url: row.get("favicon_url")?,
        flavor: row.get("flavor")?,
        has_details: row.get("has_details")?,
        has_pictures: row.get("has_pictures")?,
        has_videos: row.get("has_videos")?,
        requires_service_workers: row.get("requires_service_workers")?,
        file_url_bookmark: row.get("file_url_bookmark")?,
        included_in_search: row.get("included_in_search")?,
        is_missing: row.get("is_missing")?,
    })
}

impl LibraryStore for SqliteLibraryStore {
    fn zim_file_ids(&self) -> Result<HashSet<Uuid>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT file_id FROM zim_files")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|id| id.ok().and_then(|id| Uuid::parse_str(&id).ok()))
            .collect();
        Ok(ids)
    }

    fn get_zim_file(&self, id: &Uuid) -> Result<Option<ZimFileRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let record = conn
            .query_row(
                "SELECT * FROM zim_files WHERE file_id = ?1",
                params![id.to_string()],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn bulk_insert(&self, metadata: &[ZimFileMetadata]) -> Result<u32, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut inserted = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO zim_files (
                    file_id, group_identifier, title, description, language_codes,
                    category, created, size, article_count, media_count, creator,
                    publisher, download_url, favicon_url, flavor, has_details,
                    has_pictures, has_videos, requires_service_workers,
                    file_url_bookmark, included_in_search, is_missing
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                    ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, NULL, 1, 0
                )",
            )?;
            for item in metadata {
                inserted += stmt.execute(params![
                    item.file_id.to_string(),
                    item.group_identifier,
                    item.title,
                    item.description,
                    item.language_codes,
                    item.category,
                    item.created.map(|dt| dt.to_rfc3339()),
                    item.size as i64,
                    item.article_count as i64,
                    item.media_count as i64,
                    item.creator,
                    item.publisher,
                    item.download_url,
                    item.favicon_url,
                    item.flavor,
                    item.has_details,
                    item.has_pictures,
                    item.has_videos,
                    item.requires_service_workers,
                ])? as u32;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn bulk_delete_not_downloaded(&self, keep: &HashSet<Uuid>) -> Result<u32, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut deleted = 0u32;
        {
            let stale: Vec<String> = {
                let mut stmt = tx.prepare(
                    "SELECT file_id FROM zim_files WHERE file_url_bookmark IS NULL",
                )?;
                let ids: Vec<String> = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .filter_map(|id| id.ok())
                    .filter(|id| {
                        Uuid::parse_str(id)
                            .map(|id| !keep.contains(&id))
                            .unwrap_or(true)
                    })
                    .collect();
                ids
            };
            let mut stmt = tx.prepare("DELETE FROM zim_files WHERE file_id = ?1")?;
            for id in stale {
                deleted += stmt.execute(params![id])? as u32;
            }
        }
        tx.commit()?;
        Ok(deleted)
    }

    fn delete_all_not_downloaded(&self) -> Result<u32, StoreError> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM zim_files WHERE file_url_bookmark IS NULL",
            [],
        )?;
        Ok(deleted as u32)
    }

    fn category_language_projections(&self) -> Result<Vec<(String, String)>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT DISTINCT category, language_codes FROM zim_files")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pairs)
    }

    fn save_category_languages(
        &self,
        index: &HashMap<Category, HashSet<String>>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM category_languages", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO category_languages (category, language) VALUES (?1, ?2)",
            )?;
            for (category, languages) in index {
                for language in languages {
                    stmt.execute(params![category.as_str(), language])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn category_languages(&self) -> Result<HashMap<Category, HashSet<String>>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT category, language FROM category_languages")?;
        let mut index: HashMap<Category, HashSet<String>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (category, language) = row?;
            index
                .entry(Category::from_tag(&category))
                .or_default()
                .insert(language);
        }
        Ok(index)
    }

    fn language_counts(&self) -> Result<Vec<(String, u32)>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT language_codes, COUNT(*) FROM zim_files GROUP BY language_codes",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u32))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }
}

const PREF_LAST_REFRESH: &str = "last_refresh";
const PREF_ETAG: &str = "etag";
const PREF_AUTO_REFRESH: &str = "auto_refresh";
const PREF_LANGUAGE_CODES: &str = "language_codes";
const PREF_OLD_LANGUAGE_CODES: &str = "using_old_language_codes";

impl Preferences for SqliteLibraryStore {
    fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.get_pref(PREF_LAST_REFRESH)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn set_last_refresh(&self, at: DateTime<Utc>) {
        self.set_pref(PREF_LAST_REFRESH, &at.to_rfc3339());
    }

    fn etag(&self) -> Option<String> {
        self.get_pref(PREF_ETAG)
    }

    fn set_etag(&self, etag: Option<&str>) {
        match etag {
            Some(etag) => self.set_pref(PREF_ETAG, etag),
            None => self.delete_pref(PREF_ETAG),
        }
    }

    fn auto_refresh(&self) -> bool {
        self.get_pref(PREF_AUTO_REFRESH)
            .map(|s| s == "true")
            .unwrap_or(true)
    }

    fn set_auto_refresh(&self, enabled: bool) {
        self.set_pref(PREF_AUTO_REFRESH, if enabled { "true" } else { "false" });
    }

    fn language_codes(&self) -> HashSet<String> {
        self.get_pref(PREF_LANGUAGE_CODES)
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_language_codes(&self, codes: &HashSet<String>) {
        let mut sorted: Vec<&str> = codes.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        self.set_pref(PREF_LANGUAGE_CODES, &sorted.join(","));
    }

    fn using_old_language_codes(&self) -> bool {
        self.get_pref(PREF_OLD_LANGUAGE_CODES)
            .map(|s| s == "true")
            .unwrap_or(false)
    }

    fn set_using_old_language_codes(&self, value: bool) {
        self.set_pref(
            PREF_OLD_LANGUAGE_CODES,
            if value { "true" } else { "false" },
        );
    }
}

impl FlagStore for SqliteLibraryStore {
    fn bool_for(&self, key: &str) -> bool {
        self.get_pref(key).map(|s| s == "true").unwrap_or(false)
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.set_pref(key, if value { "true" } else { "false" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata(title: &str) -> ZimFileMetadata {
        ZimFileMetadata {
            file_id: Uuid::new_v4(),
            group_identifier: "wikipedia_en_top".to_string(),
            title: title.to_string(),
            description: "description".to_string(),
            language_codes: "eng".to_string(),
            category: "wikipedia".to_string(),
            created: Some(Utc::now()),
            size: 1024,
            article_count: 10,
            media_count: 20,
            creator: "Wikipedia".to_string(),
            publisher: "Kiwix".to_string(),
            download_url: Some("https://download.example.org/file.zim.meta4".to_string()),
            favicon_url: None,
            flavor: Some("maxi".to_string()),
            has_details: true,
            has_pictures: true,
            has_videos: false,
            requires_service_workers: false,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = SqliteLibraryStore::in_memory().unwrap();
        let metadata = sample_metadata("Best of Wikipedia");
        assert_eq!(store.bulk_insert(&[metadata.clone()]).unwrap(), 1);

        let record = store.get_zim_file(&metadata.file_id).unwrap().unwrap();
        assert_eq!(record.title, "Best of Wikipedia");
        assert_eq!(record.language_codes, "eng");
        assert!(record.included_in_search);
        assert!(record.file_url_bookmark.is_none());
    }

    #[test]
    fn test_insert_ignores_existing_ids() {
        let store = SqliteLibraryStore::in_memory().unwrap();
        let metadata = sample_metadata("Original");
        store.bulk_insert(&[metadata.clone()]).unwrap();

        let mut updated = metadata.clone();
        updated.title = "Changed".to_string();
        assert_eq!(store.bulk_insert(&[updated]).unwrap(), 0);
        let record = store.get_zim_file(&metadata.file_id).unwrap().unwrap();
        assert_eq!(record.title, "Original");
    }

    #[test]
    fn test_bulk_delete_preserves_downloaded() {
        let store = SqliteLibraryStore::in_memory().unwrap();
        let downloaded = sample_metadata("Downloaded");
        let stale = sample_metadata("Stale");
        store
            .bulk_insert(&[downloaded.clone(), stale.clone()])
            .unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "UPDATE zim_files SET file_url_bookmark = 'bookmark' WHERE file_id = ?1",
                params![downloaded.file_id.to_string()],
            )
            .unwrap();
        }

        let deleted = store
            .bulk_delete_not_downloaded(&HashSet::new())
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(store.get_zim_file(&downloaded.file_id).unwrap().is_some());
        assert!(store.get_zim_file(&stale.file_id).unwrap().is_none());
    }

    #[test]
    fn test_bulk_delete_keeps_matching_ids() {
        let store = SqliteLibraryStore::in_memory().unwrap();
        let kept = sample_metadata("Kept");
        let stale = sample_metadata("Stale");
        store.bulk_insert(&[kept.clone(), stale.clone()]).unwrap();

        let keep: HashSet<Uuid> = [kept.file_id].into_iter().collect();
        assert_eq!(store.bulk_delete_not_downloaded(&keep).unwrap(), 1);
        assert!(store.get_zim_file(&kept.file_id).unwrap().is_some());
        assert!(store.get_zim_file(&stale.file_id).unwrap().is_none());
    }

    #[test]
    fn test_category_languages_round_trip() {
        let store = SqliteLibraryStore::in_memory().unwrap();
        let mut index = HashMap::new();
        index.insert(
            Category::Wikipedia,
            ["eng".to_string(), "fra".to_string()].into_iter().collect(),
        );
        index.insert(
            Category::Ted,
            ["eng".to_string()].into_iter().collect::<HashSet<_>>(),
        );
        store.save_category_languages(&index).unwrap();
        assert_eq!(store.category_languages().unwrap(), index);

        // saving again replaces the old index
        let mut replacement = HashMap::new();
        replacement.insert(
            Category::Gutenberg,
            ["deu".to_string()].into_iter().collect::<HashSet<_>>(),
        );
        store.save_category_languages(&replacement).unwrap();
        assert_eq!(store.category_languages().unwrap(), replacement);
    }

    #[test]
    fn test_language_counts() {
        let store = SqliteLibraryStore::in_memory().unwrap();
        let mut french = sample_metadata("French");
        french.language_codes = "fra".to_string();
        store
            .bulk_insert(&[
                sample_metadata("A"),
                sample_metadata("B"),
                french,
            ])
            .unwrap();

        let mut counts = store.language_counts().unwrap();
        counts.sort();
        assert_eq!(
            counts,
            vec![("eng".to_string(), 2), ("fra".to_string(), 1)]
        );
    }

    #[test]
    fn test_preferences_round_trip() {
        let store = SqliteLibraryStore::in_memory().unwrap();
        assert!(store.etag().is_none());
        assert!(store.auto_refresh());
        assert!(store.language_codes().is_empty());

        store.set_etag(Some("\"abc123\""));
        assert_eq!(store.etag().as_deref(), Some("\"abc123\""));
        store.set_etag(None);
        assert!(store.etag().is_none());

        store.set_auto_refresh(false);
        assert!(!store.auto_refresh());

        let now = Utc::now();
        store.set_last_refresh(now);
        let stored = store.last_refresh().unwrap();
        assert_eq!(stored.timestamp(), now.timestamp());

        let codes: HashSet<String> = ["eng".to_string(), "fra".to_string()].into_iter().collect();
        store.set_language_codes(&codes);
        assert_eq!(store.language_codes(), codes);
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.db");
        let metadata = sample_metadata("Persisted");
        {
            let store = SqliteLibraryStore::new(&path).unwrap();
            store.bulk_insert(&[metadata.clone()]).unwrap();
        }
        let store = SqliteLibraryStore::new(&path).unwrap();
        assert!(store.get_zim_file(&metadata.file_id).unwrap().is_some());
    }

    #[test]
    fn test_flag_store() {
        let mut store = SqliteLibraryStore::in_memory().unwrap();
        assert!(!store.bool_for("migrated"));
        store.set_bool("migrated", true);
        assert!(store.bool_for("migrated"));
    }
}
