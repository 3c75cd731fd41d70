use crate::error::{GolinksError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Where unknown tokens go when no command or bookmark matches.
pub const DEFAULT_URL: &str = "https://www.google.com/search?q=%s&btnK";

/// Configuration for golinks, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GolinksConfig {
    /// Fallback redirect template. Empty disables the fallback.
    #[serde(default = "default_url")]
    pub url: String,

    /// Seed the default bookmarks into an empty store on startup
    #[serde(default = "default_seed_bookmarks")]
    pub seed_bookmarks: bool,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_seed_bookmarks() -> bool {
    true
}

impl Default for GolinksConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            seed_bookmarks: default_seed_bookmarks(),
        }
    }
}

impl GolinksConfig {
    pub const KEYS: [&'static str; 2] = ["url", "seed-bookmarks"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: GolinksConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "url" => Ok(self.url.clone()),
            "seed-bookmarks" => Ok(self.seed_bookmarks.to_string()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "url" => {
                if value.matches(crate::model::PLACEHOLDER).count() > 1 {
                    return Err(GolinksError::Config(
                        "url may contain at most one %s placeholder".to_string(),
                    ));
                }
                self.url = value.to_string();
            }
            "seed-bookmarks" => {
                self.seed_bookmarks = value.parse().map_err(|_| {
                    GolinksError::Config(format!("seed-bookmarks must be true or false, got {}", value))
                })?;
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> GolinksError {
    GolinksError::Config(format!(
        "Unknown config key: {} (known: {})",
        key,
        GolinksConfig::KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GolinksConfig::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert!(config.seed_bookmarks);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = GolinksConfig::load(dir.path()).unwrap();
        assert_eq!(config, GolinksConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");

        let mut config = GolinksConfig::default();
        config.set("url", "").unwrap();
        config.set("seed-bookmarks", "false").unwrap();
        config.save(&nested).unwrap();

        let loaded = GolinksConfig::load(&nested).unwrap();
        assert_eq!(loaded.url, "");
        assert!(!loaded.seed_bookmarks);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"seed_bookmarks": false}"#).unwrap();

        let loaded = GolinksConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.url, DEFAULT_URL);
        assert!(!loaded.seed_bookmarks);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{").unwrap();
        assert!(matches!(
            GolinksConfig::load(dir.path()),
            Err(GolinksError::Serialization(_))
        ));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = GolinksConfig::default();
        assert!(config.set("url", "https://x/?a=%s&b=%s").is_err());
        assert!(config.set("seed-bookmarks", "maybe").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, GolinksConfig::default());
    }

    #[test]
    fn test_get_known_keys() {
        let config = GolinksConfig::default();
        assert_eq!(config.get("url").unwrap(), DEFAULT_URL);
        assert_eq!(config.get("seed-bookmarks").unwrap(), "true");
        assert!(config.get("nope").is_err());
    }
}
