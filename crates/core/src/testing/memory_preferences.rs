use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::library::Preferences;

#[derive(Debug, Default)]
struct State {
    last_refresh: Option<DateTime<Utc>>,
    etag: Option<String>,
    auto_refresh_disabled: bool,
    language_codes: HashSet<String>,
    using_old_language_codes: bool,
}

/// In-memory [`Preferences`], defaulting to auto refresh enabled.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    state: Mutex<State>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.state.lock().unwrap().last_refresh
    }

    fn set_last_refresh(&self, at: DateTime<Utc>) {
        self.state.lock().unwrap().last_refresh = Some(at);
    }

    fn etag(&self) -> Option<String> {
        self.state.lock().unwrap().etag.clone()
    }

    fn set_etag(&self, etag: Option<&str>) {
        self.state.lock().unwrap().etag = etag.map(str::to_string);
    }

    fn auto_refresh(&self) -> bool {
        !self.state.lock().unwrap().auto_refresh_disabled
    }

    fn set_auto_refresh(&self, enabled: bool) {
        self.state.lock().unwrap().auto_refresh_disabled = !enabled;
    }

    fn language_codes(&self) -> HashSet<String> {
        self.state.lock().unwrap().language_codes.clone()
    }

    fn set_language_codes(&self, codes: &HashSet<String>) {
        self.state.lock().unwrap().language_codes = codes.clone();
    }

    fn using_old_language_codes(&self) -> bool {
        self.state.lock().unwrap().using_old_language_codes
    }

    fn set_using_old_language_codes(&self, value: bool) {
        self.state.lock().unwrap().using_old_language_codes = value;
    }
}
