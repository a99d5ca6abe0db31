//! User configuration loaded from `config.toml`.
//!
//! ```toml
//! [logging]
//! default = "warn"
//!
//! [storage]
//! history_capacity = 50
//!
//! [calculator]
//! copy_results = true
//!
//! [ai]
//! model = "gemini-2.0-flash"
//! ```
//!
//! Every section and field is optional; missing values take their defaults.

use crate::calculator::MAX_DISPLAY_LENGTH;
use crate::storage::DEFAULT_CAPACITY;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "calcugenius";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub calculator: CalculatorConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub default: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted lists. Defaults to the user data dir.
    pub data_dir: Option<PathBuf>,
    pub history_capacity: usize,
    pub saved_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_capacity: DEFAULT_CAPACITY,
            saved_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl StorageConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub max_display_length: usize,
    /// Copy the final display value to the clipboard after `press`.
    pub copy_results: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_display_length: MAX_DISPLAY_LENGTH,
            copy_results: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// One of `google`, `openai`, `anthropic`, `ollama`.
    pub backend: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: "google".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits of zero, which would discard every entry or keystroke.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.storage.history_capacity > 0,
            "storage.history_capacity must be at least 1"
        );
        anyhow::ensure!(
            self.storage.saved_capacity > 0,
            "storage.saved_capacity must be at least 1"
        );
        anyhow::ensure!(
            self.calculator.max_display_length > 0,
            "calculator.max_display_length must be at least 1"
        );
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [storage]
            history_capacity = 10

            [ai]
            model = "gemini-pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.history_capacity, 10);
        assert_eq!(config.storage.saved_capacity, DEFAULT_CAPACITY);
        assert_eq!(config.ai.model, "gemini-pro");
        assert_eq!(config.ai.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.logging.default, "warn");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.toml");
        let mut config = Config::default();
        config.calculator.copy_results = true;
        config.storage.data_dir = Some(dir.path().to_path_buf());
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        for contents in [
            "[storage]\nhistory_capacity = 0",
            "[storage]\nsaved_capacity = 0",
            "[calculator]\nmax_display_length = 0",
        ] {
            let err = Config::parse(contents).unwrap_err();
            assert!(err.to_string().contains("must be at least 1"), "{contents}");
        }
        assert!(Config::parse("[storage]\nhistory_capacity = 1").is_ok());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::parse("[storage\n").is_err());
    }
}
