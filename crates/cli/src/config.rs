//! CLI configuration utilities

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the optional configuration file inside the data directory
pub const CONFIG_FILE: &str = "config.json";

/// Name of the persisted session file inside the data directory
pub const SESSION_FILE: &str = "session.json";

/// Settings for talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Where the session is persisted (defaults to `<data_dir>/session.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: shop_http::DEFAULT_TIMEOUT.as_secs(),
            session_file: None,
        }
    }
}

impl CliConfig {
    /// Load configuration: defaults, then `<data_dir>/config.json`, then `SHOP_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment values cannot be parsed
    pub fn load(data_dir: &Path) -> Result<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .add_source(config::File::from(data_dir.join(CONFIG_FILE)).required(false))
            .add_source(config::Environment::with_prefix("SHOP").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Resolved location of the session file
    pub fn session_path(&self, data_dir: &Path) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| data_dir.join(SESSION_FILE))
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Save configuration to JSON file
pub fn save_config<P: AsRef<Path>>(config: &CliConfig, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Generate a default configuration file
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    save_config(&CliConfig::default(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_a_file() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::load(dir.path()).unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.session_path(dir.path()), dir.path().join(SESSION_FILE));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let custom = CliConfig {
            base_url: "https://shop.example".to_string(),
            timeout_secs: 3,
            session_file: Some(dir.path().join("elsewhere.json")),
        };
        save_config(&custom, dir.path().join(CONFIG_FILE)).unwrap();

        let loaded = CliConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.base_url, "https://shop.example");
        assert_eq!(loaded.timeout_secs, 3);
        assert_eq!(loaded.session_path(dir.path()), dir.path().join("elsewhere.json"));
    }

    #[test]
    fn generated_file_round_trips() {
        let dir = TempDir::new().unwrap();
        generate_default_config(dir.path().join(CONFIG_FILE)).unwrap();

        let loaded = CliConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.timeout_secs, CliConfig::default().timeout_secs);
        assert_eq!(loaded.session_file, None);
    }
}
