//! Language code handling for the catalog.
//!
//! Catalog entries carry comma-joined ISO 639-3 (alpha-3) language codes.
//! This module validates and aggregates those codes, and converts legacy
//! alpha-2 codes (old feeds, device locales) into the alpha-3 vocabulary.

mod codes;
mod collector;
mod convert;

pub use codes::{alpha3_from_alpha2, display_name, is_known_alpha3};
pub use collector::{Language, LanguageCollector};
pub use convert::convert_codes;

/// The code seeded when neither the stored selection nor the device
/// language yields a valid filter. Most catalog content is English.
pub const FALLBACK_LANGUAGE: &str = "eng";

/// Best-effort device language from the `LANG` environment variable,
/// e.g. `fr_FR.UTF-8` -> `fr`. Alpha-2 or alpha-3 depending on the locale.
pub fn device_language() -> Option<String> {
    let lang = std::env::var("LANG").ok()?;
    let code: String = lang
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    if code.is_empty() || code == "c" || code == "posix" {
        None
    } else {
        Some(code)
    }
}
