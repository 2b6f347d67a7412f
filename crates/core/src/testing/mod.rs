//! Test doubles and feed fixtures shared by unit and integration tests.

pub mod fixtures;
mod memory_chunk_source;
mod memory_flag_store;
mod memory_preferences;
mod mock_fetcher;
mod mock_searcher;

pub use memory_chunk_source::MemoryChunkSource;
pub use memory_flag_store::MemoryFlagStore;
pub use memory_preferences::MemoryPreferences;
pub use mock_fetcher::MockFeedFetcher;
pub use mock_searcher::MockArchiveSearcher;
