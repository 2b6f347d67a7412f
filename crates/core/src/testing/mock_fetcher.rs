use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::library::{FeedFetcher, FetchOutcome, LibraryError};

/// Scripted [`FeedFetcher`] returning queued outcomes in order and
/// recording the etags it was called with.
#[derive(Debug, Default)]
pub struct MockFeedFetcher {
    outcomes: Mutex<VecDeque<Result<FetchOutcome, LibraryError>>>,
    etags: Mutex<Vec<Option<String>>>,
    delay: Mutex<Option<Duration>>,
}

impl MockFeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_outcome(&self, outcome: Result<FetchOutcome, LibraryError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    /// Queue a 200 response carrying `data`.
    pub fn push_feed(&self, data: &str, etag: Option<&str>, url_host: &str) {
        self.push_outcome(Ok(FetchOutcome::Fetched {
            data: data.as_bytes().to_vec(),
            etag: etag.map(str::to_string),
            url_host: url_host.to_string(),
        }));
    }

    /// Delay every fetch, to exercise overlapping refreshes.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Etags observed by `fetch` calls, in order.
    pub fn requested_etags(&self) -> Vec<Option<String>> {
        self.etags.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedFetcher for MockFeedFetcher {
    async fn fetch(&self, etag: Option<&str>) -> Result<FetchOutcome, LibraryError> {
        self.etags.lock().unwrap().push(etag.map(str::to_string));
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LibraryError::Retrieval {
                    status: None,
                    message: "no scripted outcome left".to_string(),
                })
            })
    }
}
