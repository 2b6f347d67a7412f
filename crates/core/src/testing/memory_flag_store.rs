use std::collections::HashMap;

use crate::migration::FlagStore;

/// In-memory [`FlagStore`].
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    values: HashMap<String, bool>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn bool_for(&self, key: &str) -> bool {
        self.values.get(key).copied().unwrap_or(false)
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), value);
    }
}
