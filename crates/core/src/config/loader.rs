use std::path::Path;

use figment::providers::{Env, Format, Toml};
use figment::Figment;

use super::types::Config;
use super::ConfigError;

/// Load configuration from a TOML file, with `ZIMSHELF_` prefixed
/// environment variables layered on top.
///
/// `ZIMSHELF_CATALOG_URL` overrides `catalog.url`, and so on.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("ZIMSHELF_").split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from a TOML string, without the environment layer.
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    Figment::new()
        .merge(Toml::string(content))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.catalog.timeout_secs, 20);
        assert_eq!(config.database.path, "zimshelf.db");
    }

    #[test]
    fn test_partial_config() {
        let config = load_config_from_str(
            r#"
            [catalog]
            url = "https://mirror.example.org/v2/entries"
            auto_refresh = false

            [search]
            result_limit = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.url, "https://mirror.example.org/v2/entries");
        assert!(!config.catalog.auto_refresh);
        assert_eq!(config.catalog.refresh_interval_secs, 86400);
        assert_eq!(config.search.result_limit, 10);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = load_config_from_str("not [valid toml");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_config(Path::new("/nonexistent/zimshelf.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
