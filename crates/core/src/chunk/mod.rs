//! Byte-range slicing and chunked data streaming.
//!
//! Large binary content (a ZIM archive being downloaded, or a big media
//! entry served to a reader) is retrieved as a sequence of contiguous byte
//! ranges. This module computes the covering range set and drives a lazy,
//! single-pass pull of the chunks from a data source.

mod ranges;
mod stream;

pub use ranges::{byte_ranges, byte_ranges_from};
pub use stream::{ChunkDataSource, ChunkStream};

use thiserror::Error;

/// Errors for chunked data streaming.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// A stream cannot be built over zero ranges.
    #[error("cannot build a chunk stream from an empty range list")]
    EmptyRanges,
}
