use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::fetcher::{FeedFetcher, FetchOutcome};
use super::types::{Category, LibraryError, LibraryState, StoreError};
use super::{LibraryStore, Preferences};
use crate::config::CatalogConfig;
use crate::feed::{FeedError, OpdsParser, ZimFileMetadata};
use crate::lang::{
    alpha3_from_alpha2, convert_codes, device_language, LanguageCollector, FALLBACK_LANGUAGE,
};
use crate::metrics;

/// Drives catalog refreshes: conditional fetch, record reconciliation,
/// category index rebuild and default language resolution.
///
/// Only one refresh runs at a time; a second `start` call while one is
/// in progress returns immediately.
pub struct LibraryRefresher {
    config: CatalogConfig,
    fetcher: Arc<dyn FeedFetcher>,
    store: Arc<dyn LibraryStore>,
    prefs: Arc<dyn Preferences>,
    state: Mutex<LibraryState>,
    last_error: Mutex<Option<LibraryError>>,
}

impl LibraryRefresher {
    pub fn new(
        config: CatalogConfig,
        fetcher: Arc<dyn FeedFetcher>,
        store: Arc<dyn LibraryStore>,
        prefs: Arc<dyn Preferences>,
    ) -> Self {
        // a persisted last-refresh timestamp means a complete catalog
        // already exists locally
        let state = if prefs.last_refresh().is_some() {
            LibraryState::Complete
        } else {
            LibraryState::Initial
        };
        Self {
            config,
            fetcher,
            store,
            prefs,
            state: Mutex::new(state),
            last_error: Mutex::new(None),
        }
    }

    pub fn state(&self) -> LibraryState {
        *self.state.lock().unwrap()
    }

    pub fn error(&self) -> Option<LibraryError> {
        self.last_error.lock().unwrap().clone()
    }

    /// Run a refresh if one is due.
    ///
    /// User-initiated refreshes always run. Automatic refreshes are
    /// skipped when auto refresh is disabled or the local catalog is
    /// younger than the configured interval.
    pub async fn start(&self, is_user_initiated: bool) {
        if !is_user_initiated && !self.should_auto_refresh() {
            return;
        }
        {
            let mut state = self.state.lock().unwrap();
            if *state == LibraryState::InProgress {
                debug!("Refresh already in progress, skipping");
                return;
            }
            *state = LibraryState::InProgress;
        }

        match self.refresh().await {
            Ok(()) => {
                *self.last_error.lock().unwrap() = None;
                *self.state.lock().unwrap() = LibraryState::Complete;
            }
            Err(e) => {
                warn!(error = %e, "Library refresh failed");
                *self.last_error.lock().unwrap() = Some(e);
                *self.state.lock().unwrap() = LibraryState::Error;
            }
        }
    }

    fn should_auto_refresh(&self) -> bool {
        if !self.config.auto_refresh || !self.prefs.auto_refresh() {
            return false;
        }
        match self.prefs.last_refresh() {
            None => true,
            Some(last) => {
                let age = Utc::now().signed_duration_since(last);
                age.num_seconds() >= self.config.refresh_interval_secs as i64
            }
        }
    }

    async fn refresh(&self) -> Result<(), LibraryError> {
        let etag = self.prefs.etag();
        let outcome = match self.fetcher.fetch(etag.as_deref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                metrics::FEED_FETCHES.with_label_values(&["error"]).inc();
                return Err(e);
            }
        };

        match outcome {
            FetchOutcome::NotModified => {
                metrics::FEED_FETCHES
                    .with_label_values(&["not_modified"])
                    .inc();
                debug!("Catalog not modified, rebuilding index from stored records");
                self.rebuild_index_from_store().map_err(process_error)?;
                self.resolve_default_language().map_err(process_error)?;
                Ok(())
            }
            FetchOutcome::Fetched {
                data,
                etag,
                url_host,
            } => {
                metrics::FEED_FETCHES.with_label_values(&["fetched"]).inc();
                // remember the etag before parsing so a parse failure
                // does not refetch an unparseable body forever with a
                // stale validator
                self.prefs.set_etag(etag.as_deref());

                let mut parser = OpdsParser::new();
                parser.parse(&data, &url_host).map_err(|e| match e {
                    FeedError::Decode(msg) | FeedError::Parse(msg) => LibraryError::Parse(msg),
                })?;

                if self.prefs.using_old_language_codes() {
                    let removed = self
                        .store
                        .delete_all_not_downloaded()
                        .map_err(process_error)?;
                    self.prefs.set_using_old_language_codes(false);
                    info!(removed, "Cleared records stored with legacy language codes");
                }

                let existing = self.store.zim_file_ids().map_err(process_error)?;
                let feed_ids = parser.zim_file_ids();
                let to_insert: Vec<ZimFileMetadata> = feed_ids
                    .difference(&existing)
                    .filter_map(|id| parser.get_metadata(id).cloned())
                    .collect();

                let inserted = self.store.bulk_insert(&to_insert).map_err(process_error)?;
                let deleted = self
                    .store
                    .bulk_delete_not_downloaded(&feed_ids)
                    .map_err(process_error)?;
                metrics::REFRESH_INSERTIONS.inc_by(inserted as u64);
                metrics::REFRESH_DELETIONS.inc_by(deleted as u64);

                self.prefs.set_last_refresh(Utc::now());

                let mut index: HashMap<Category, HashSet<String>> = HashMap::new();
                for metadata in parser.entries() {
                    collect_languages(
                        &mut index,
                        &metadata.category,
                        &metadata.language_codes,
                    );
                }
                self.store
                    .save_category_languages(&index)
                    .map_err(process_error)?;

                self.resolve_default_language().map_err(process_error)?;

                info!(
                    insertions = inserted,
                    deletions = deleted,
                    total = feed_ids.len(),
                    "Refresh finished"
                );
                Ok(())
            }
        }
    }

    fn rebuild_index_from_store(&self) -> Result<(), StoreError> {
        let mut index: HashMap<Category, HashSet<String>> = HashMap::new();
        for (category, languages) in self.store.category_language_projections()? {
            collect_languages(&mut index, &category, &languages);
        }
        self.store.save_category_languages(&index)
    }

    /// Ensure the preferred language codes resolve to languages that
    /// actually exist in the catalog, falling back to the device locale
    /// and finally to English.
    fn resolve_default_language(&self) -> Result<(), StoreError> {
        let mut collector = LanguageCollector::new();
        for (codes, count) in self.store.language_counts()? {
            collector.add_languages(&codes, count as i64);
        }
        let valid = collector.codes();

        let stored = self.prefs.language_codes();
        let converted = convert_codes(&stored, &valid);
        if !converted.is_empty() {
            if converted != stored {
                self.prefs.set_language_codes(&converted);
            }
            return Ok(());
        }

        let device = self
            .config
            .device_language
            .clone()
            .or_else(device_language);
        if let Some(code) = device {
            let resolved = if valid.contains(&code) {
                Some(code)
            } else {
                alpha3_from_alpha2(&code)
                    .filter(|alpha3| valid.contains(*alpha3))
                    .map(str::to_string)
            };
            if let Some(code) = resolved {
                debug!(code = %code, "Defaulting content language to device locale");
                self.prefs
                    .set_language_codes(&HashSet::from([code]));
                return Ok(());
            }
        }

        self.prefs
            .set_language_codes(&HashSet::from([FALLBACK_LANGUAGE.to_string()]));
        Ok(())
    }
}

fn process_error(e: StoreError) -> LibraryError {
    LibraryError::Process(e.to_string())
}

fn collect_languages(
    index: &mut HashMap<Category, HashSet<String>>,
    category: &str,
    language_codes: &str,
) {
    let languages = index.entry(Category::from_tag(category)).or_default();
    for code in language_codes.split(',') {
        let code = code.trim();
        if !code.is_empty() {
            languages.insert(code.to_string());
        }
    }
}
