//! Static ISO 639 code tables.
//!
//! Covers the languages that actually appear in the public ZIM catalogs.
//! Unknown codes are simply not resolvable; callers drop them.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Alpha-3 code -> English display name.
static ALPHA3_NAMES: &[(&str, &str)] = &[
    ("amh", "Amharic"),
    ("ara", "Arabic"),
    ("aze", "Azerbaijani"),
    ("bel", "Belarusian"),
    ("ben", "Bengali"),
    ("bos", "Bosnian"),
    ("bul", "Bulgarian"),
    ("cat", "Catalan"),
    ("ces", "Czech"),
    ("cym", "Welsh"),
    ("dan", "Danish"),
    ("deu", "German"),
    ("ell", "Greek"),
    ("eng", "English"),
    ("epo", "Esperanto"),
    ("est", "Estonian"),
    ("eus", "Basque"),
    ("fas", "Persian"),
    ("fin", "Finnish"),
    ("fra", "French"),
    ("gle", "Irish"),
    ("glg", "Galician"),
    ("guj", "Gujarati"),
    ("hat", "Haitian Creole"),
    ("hau", "Hausa"),
    ("heb", "Hebrew"),
    ("hin", "Hindi"),
    ("hrv", "Croatian"),
    ("hun", "Hungarian"),
    ("hye", "Armenian"),
    ("ibo", "Igbo"),
    ("ind", "Indonesian"),
    ("isl", "Icelandic"),
    ("ita", "Italian"),
    ("jpn", "Japanese"),
    ("kan", "Kannada"),
    ("kat", "Georgian"),
    ("kaz", "Kazakh"),
    ("khm", "Khmer"),
    ("kir", "Kyrgyz"),
    ("kor", "Korean"),
    ("kur", "Kurdish"),
    ("lao", "Lao"),
    ("lat", "Latin"),
    ("lav", "Latvian"),
    ("lit", "Lithuanian"),
    ("mal", "Malayalam"),
    ("mar", "Marathi"),
    ("mkd", "Macedonian"),
    ("mlg", "Malagasy"),
    ("mon", "Mongolian"),
    ("msa", "Malay"),
    ("mya", "Burmese"),
    ("nep", "Nepali"),
    ("nld", "Dutch"),
    ("nor", "Norwegian"),
    ("ori", "Odia"),
    ("pan", "Punjabi"),
    ("pol", "Polish"),
    ("por", "Portuguese"),
    ("pus", "Pashto"),
    ("ron", "Romanian"),
    ("rus", "Russian"),
    ("sin", "Sinhala"),
    ("slk", "Slovak"),
    ("slv", "Slovenian"),
    ("som", "Somali"),
    ("spa", "Spanish"),
    ("sqi", "Albanian"),
    ("srp", "Serbian"),
    ("swa", "Swahili"),
    ("swe", "Swedish"),
    ("tam", "Tamil"),
    ("tel", "Telugu"),
    ("tgk", "Tajik"),
    ("tha", "Thai"),
    ("tur", "Turkish"),
    ("ukr", "Ukrainian"),
    ("urd", "Urdu"),
    ("uzb", "Uzbek"),
    ("vie", "Vietnamese"),
    ("yor", "Yoruba"),
    ("zho", "Chinese"),
    ("zul", "Zulu"),
];

/// Alpha-2 code -> alpha-3 (terminological) code, same coverage as above.
static ALPHA2_TO_ALPHA3: &[(&str, &str)] = &[
    ("am", "amh"),
    ("ar", "ara"),
    ("az", "aze"),
    ("be", "bel"),
    ("bn", "ben"),
    ("bs", "bos"),
    ("bg", "bul"),
    ("ca", "cat"),
    ("cs", "ces"),
    ("cy", "cym"),
    ("da", "dan"),
    ("de", "deu"),
    ("el", "ell"),
    ("en", "eng"),
    ("eo", "epo"),
    ("et", "est"),
    ("eu", "eus"),
    ("fa", "fas"),
    ("fi", "fin"),
    ("fr", "fra"),
    ("ga", "gle"),
    ("gl", "glg"),
    ("gu", "guj"),
    ("ht", "hat"),
    ("ha", "hau"),
    ("he", "heb"),
    ("hi", "hin"),
    ("hr", "hrv"),
    ("hu", "hun"),
    ("hy", "hye"),
    ("ig", "ibo"),
    ("id", "ind"),
    ("is", "isl"),
    ("it", "ita"),
    ("ja", "jpn"),
    ("kn", "kan"),
    ("ka", "kat"),
    ("kk", "kaz"),
    ("km", "khm"),
    ("ky", "kir"),
    ("ko", "kor"),
    ("ku", "kur"),
    ("lo", "lao"),
    ("la", "lat"),
    ("lv", "lav"),
    ("lt", "lit"),
    ("ml", "mal"),
    ("mr", "mar"),
    ("mk", "mkd"),
    ("mg", "mlg"),
    ("mn", "mon"),
    ("ms", "msa"),
    ("my", "mya"),
    ("ne", "nep"),
    ("nl", "nld"),
    ("no", "nor"),
    ("or", "ori"),
    ("pa", "pan"),
    ("pl", "pol"),
    ("pt", "por"),
    ("ps", "pus"),
    ("ro", "ron"),
    ("ru", "rus"),
    ("si", "sin"),
    ("sk", "slk"),
    ("sl", "slv"),
    ("so", "som"),
    ("es", "spa"),
    ("sq", "sqi"),
    ("sr", "srp"),
    ("sw", "swa"),
    ("sv", "swe"),
    ("ta", "tam"),
    ("te", "tel"),
    ("tg", "tgk"),
    ("th", "tha"),
    ("tr", "tur"),
    ("uk", "ukr"),
    ("ur", "urd"),
    ("uz", "uzb"),
    ("vi", "vie"),
    ("yo", "yor"),
    ("zh", "zho"),
    ("zu", "zul"),
];

static NAME_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ALPHA3_NAMES.iter().copied().collect());

static ALPHA2_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ALPHA2_TO_ALPHA3.iter().copied().collect());

/// English display name for a known alpha-3 code.
pub fn display_name(alpha3: &str) -> Option<&'static str> {
    NAME_INDEX.get(alpha3).copied()
}

/// Whether the code is in the known alpha-3 vocabulary.
pub fn is_known_alpha3(code: &str) -> bool {
    NAME_INDEX.contains_key(code)
}

/// Convert a 2-letter code to its alpha-3 counterpart. `None` for
/// anything outside the table, no error path.
pub fn alpha3_from_alpha2(alpha2: &str) -> Option<&'static str> {
    ALPHA2_INDEX.get(alpha2).copied()
}
