//! OPDS/Atom catalog feed parsing.
//!
//! The Kiwix catalog publishes an Atom feed of ZIM archive entries with
//! OPDS acquisition links. [`OpdsParser`] turns that feed into
//! [`ZimFileMetadata`] records keyed by file id.

mod parser;
mod types;

pub use parser::OpdsParser;
pub use types::*;
