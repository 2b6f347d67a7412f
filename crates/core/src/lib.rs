//! Core library for zimshelf: offline ZIM archive catalog and search.
//!
//! The catalog side syncs the Kiwix OPDS feed into a local sqlite
//! store ([`library`]), the content side serves archive bytes in
//! chunks ([`chunk`]) and ranks queries across archives ([`search`]).

pub mod cache;
pub mod chunk;
pub mod config;
pub mod feed;
pub mod lang;
pub mod library;
pub mod metrics;
pub mod migration;
pub mod search;
pub mod testing;

pub use config::Config;
pub use library::{LibraryRefresher, SqliteLibraryStore};
pub use search::SearchEngine;
