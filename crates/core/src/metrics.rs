//! Prometheus metrics for the refresh and search paths.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Records inserted during catalog refreshes.
pub static REFRESH_INSERTIONS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "zimshelf_refresh_insertions_total",
        "Catalog records inserted by refresh runs"
    )
    .expect("Failed to register refresh insertions counter")
});

/// Records deleted during catalog refreshes.
pub static REFRESH_DELETIONS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "zimshelf_refresh_deletions_total",
        "Catalog records deleted by refresh runs"
    )
    .expect("Failed to register refresh deletions counter")
});

/// Feed fetches by outcome ("fetched", "not_modified", "error").
pub static FEED_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "zimshelf_feed_fetch_total",
        "Catalog feed fetches by outcome",
        &["outcome"]
    )
    .expect("Failed to register feed fetch counter")
});

/// Wall-clock duration of search requests.
pub static SEARCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "zimshelf_search_duration_seconds",
        "Duration of multi-archive search requests"
    )
    .expect("Failed to register search duration histogram")
});
