use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::task::AbortHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use super::levenshtein::Levenshtein;
use super::types::{RawHit, SearchError, SearchResult};
use super::ArchiveSearcher;
use crate::metrics;

/// Runs a query across a set of archives and ranks the merged hits.
///
/// At most one search is in flight per engine: starting a new one
/// aborts the previous task, whose caller observes
/// [`SearchError::Cancelled`].
pub struct SearchEngine {
    searcher: Arc<dyn ArchiveSearcher>,
    result_limit: usize,
    current: Mutex<Option<AbortHandle>>,
}

impl SearchEngine {
    pub fn new(searcher: Arc<dyn ArchiveSearcher>, result_limit: usize) -> Self {
        Self {
            searcher,
            result_limit,
            current: Mutex::new(None),
        }
    }

    pub async fn search(
        &self,
        query: &str,
        archive_ids: &[Uuid],
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim().to_string();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let timer = metrics::SEARCH_DURATION.start_timer();
        let task = tokio::spawn(run_search(
            Arc::clone(&self.searcher),
            query,
            archive_ids.to_vec(),
            self.result_limit,
        ));
        {
            let mut current = self.current.lock().unwrap();
            if let Some(previous) = current.replace(task.abort_handle()) {
                previous.abort();
            }
        }

        let result = task.await;
        timer.observe_duration();
        match result {
            Ok(results) => Ok(results),
            Err(e) if e.is_cancelled() => Err(SearchError::Cancelled),
            Err(e) => Err(SearchError::Archive(e.to_string())),
        }
    }
}

async fn run_search(
    searcher: Arc<dyn ArchiveSearcher>,
    query: String,
    archive_ids: Vec<Uuid>,
    limit: usize,
) -> Vec<SearchResult> {
    let per_archive = archive_ids.into_iter().map(|id| {
        let searcher = Arc::clone(&searcher);
        let query = query.clone();
        async move {
            let title = searcher.title_hits(&id, &query, limit).await;
            let index = searcher.index_hits(&id, &query, limit).await;
            (id, title, index)
        }
    });
    let outcomes = futures::future::join_all(per_archive).await;

    let mut lev = Levenshtein::new();
    let mut results = Vec::new();
    for (id, title, index) in outcomes {
        // title hits win over fulltext hits on the same path
        let mut by_path: HashMap<String, RawHit> = HashMap::new();
        match title {
            Ok(hits) => {
                for hit in hits {
                    by_path.entry(hit.path.clone()).or_insert(hit);
                }
            }
            Err(e) => {
                warn!(archive = %id, error = %e, "Title search failed, skipping archive");
                continue;
            }
        }
        match index {
            Ok(hits) => {
                for hit in hits {
                    by_path.entry(hit.path.clone()).or_insert(hit);
                }
            }
            Err(e) => warn!(archive = %id, error = %e, "Fulltext search failed"),
        }

        for hit in by_path.into_values() {
            let score = score_hit(&mut lev, &query, &hit);
            results.push(SearchResult {
                zim_file_id: id,
                title: hit.title,
                path: hit.path,
                score,
                snippet: hit.snippet,
            });
        }
    }

    sort_results(&mut results);
    results.truncate(limit);
    debug!(query = %query, results = results.len(), "Search finished");
    results
}

/// Lower is better. Fulltext hits fold the index's match probability
/// into the title distance so a high-probability match outranks a
/// plain distance tie.
fn score_hit(lev: &mut Levenshtein, query: &str, hit: &RawHit) -> f64 {
    let distance = lev.distance(query, &hit.title) as f64;
    match hit.probability {
        Some(probability) => distance * (7.5576 - 6.4524 * probability).ln(),
        None => distance,
    }
}

fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then_with(|| b.snippet.is_some().cmp(&a.snippet.is_some()))
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
}
