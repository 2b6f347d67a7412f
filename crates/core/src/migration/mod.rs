//! One-shot data migrations gated by persistent boolean flags.
//!
//! Each migration runs at most once successfully. A failed migration
//! leaves its flag unset and is retried on the next run.

use std::fmt;

use tracing::{info, warn};

/// Persistent boolean flags keyed by name.
pub trait FlagStore {
    fn bool_for(&self, key: &str) -> bool;
    fn set_bool(&mut self, key: &str, value: bool);
}

/// A named migration step. `run` returns whether the step succeeded.
pub struct Migration {
    key: String,
    run: Box<dyn Fn() -> bool + Send + Sync>,
}

impl Migration {
    pub fn new(key: impl Into<String>, run: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            key: key.into(),
            run: Box::new(run),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration").field("key", &self.key).finish()
    }
}

/// Runs a fixed list of migrations in order, skipping completed ones.
#[derive(Debug, Default)]
pub struct MigrationService {
    migrations: Vec<Migration>,
}

impl MigrationService {
    pub fn new(migrations: Vec<Migration>) -> Self {
        Self { migrations }
    }

    /// Run every pending migration. Returns true when all migrations,
    /// including previously completed ones, are done.
    pub fn migrate_all(&self, flags: &mut dyn FlagStore) -> bool {
        let mut all_succeeded = true;
        for migration in &self.migrations {
            if flags.bool_for(migration.key()) {
                continue;
            }
            if (migration.run)() {
                flags.set_bool(migration.key(), true);
                info!(key = %migration.key(), "Migration completed");
            } else {
                warn!(key = %migration.key(), "Migration failed, will retry on next run");
                all_succeeded = false;
            }
        }
        all_succeeded
    }
}
