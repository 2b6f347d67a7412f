use serde::{Deserialize, Serialize};

/// Top level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Catalog endpoint and refresh policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// OPDS feed URL.
    #[serde(default = "default_catalog_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    /// Whether non user-initiated refreshes are allowed.
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
    /// Minimum age of the local catalog before an automatic refresh
    /// actually runs.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Overrides the device locale when resolving a default content
    /// language, mainly for tests and headless deployments.
    #[serde(default)]
    pub device_language: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            timeout_secs: default_timeout_secs(),
            auto_refresh: default_auto_refresh(),
            refresh_interval_secs: default_refresh_interval_secs(),
            device_language: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the sqlite database file.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of results returned per query.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://opds.library.kiwix.org/v2/entries?count=-1".to_string()
}

fn default_timeout_secs() -> u32 {
    20
}

fn default_auto_refresh() -> bool {
    true
}

fn default_refresh_interval_secs() -> u64 {
    86400
}

fn default_database_path() -> String {
    "zimshelf.db".to_string()
}

fn default_result_limit() -> usize {
    25
}
