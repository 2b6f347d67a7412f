//! Lazy, single-pass chunk stream over a byte-range data source.

use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::Stream;
use tracing::debug;

use super::ChunkError;

/// A collaborator that serves inclusive byte ranges of some binary content.
///
/// `None` signals the content cannot be served (end of data or failure);
/// the stream treats it as end-of-stream, not as an error.
#[async_trait]
pub trait ChunkDataSource: Send + Sync {
    async fn fetch(&self, start: u64, end: u64) -> Option<Vec<u8>>;
}

/// A forward-only, pull-based sequence of binary chunks.
///
/// Each pull fetches the next range in list order from the data source.
/// Concatenating every yielded chunk reproduces the covered content exactly,
/// in order, with no duplication. Dropping the stream abandons iteration;
/// nothing is spawned, so no work outlives the consumer.
pub struct ChunkStream {
    ranges: std::vec::IntoIter<RangeInclusive<u64>>,
    source: Arc<dyn ChunkDataSource>,
    finished: bool,
}

impl ChunkStream {
    /// Build a stream over the given ranges. Fails if the range list is
    /// empty, since that would be a stream of nothing.
    pub fn new(
        ranges: Vec<RangeInclusive<u64>>,
        source: Arc<dyn ChunkDataSource>,
    ) -> Result<Self, ChunkError> {
        if ranges.is_empty() {
            return Err(ChunkError::EmptyRanges);
        }
        Ok(Self {
            ranges: ranges.into_iter(),
            source,
            finished: false,
        })
    }

    /// Pull the next chunk. Returns `None` once all ranges are consumed or
    /// the source stops serving data, after which every call returns `None`.
    pub async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        if self.finished {
            return None;
        }
        let Some(range) = self.ranges.next() else {
            self.finished = true;
            return None;
        };
        match self.source.fetch(*range.start(), *range.end()).await {
            Some(data) => Some(data),
            None => {
                debug!(
                    start = *range.start(),
                    end = *range.end(),
                    "Data source stopped serving, ending chunk stream"
                );
                self.finished = true;
                None
            }
        }
    }

    /// Adapt into a [`futures::Stream`] of chunks.
    pub fn into_stream(self) -> impl Stream<Item = Vec<u8>> {
        futures::stream::unfold(self, |mut chunks| async move {
            chunks.next_chunk().await.map(|data| (data, chunks))
        })
    }
}
