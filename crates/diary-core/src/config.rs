//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/diary/config.toml)
//! 3. Environment variables (DIARY_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "DIARY";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding the persisted blobs
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage key for journal entries
    #[serde(default = "default_entries_key")]
    pub entries_key: String,

    /// Storage key for the profile form
    #[serde(default = "default_profile_key")]
    pub profile_key: String,

    /// Column width used when laying out the book export
    #[serde(default = "default_line_width")]
    pub line_width: usize,

    /// Lines per page in the book export
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,

    /// Write logs here instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            entries_key: default_entries_key(),
            profile_key: default_profile_key(),
            line_width: default_line_width(),
            lines_per_page: default_lines_per_page(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (DIARY_DATA_DIR, DIARY_LOG_FILE, DIARY_LINE_WIDTH)
    /// 2. Config file (~/.config/diary/config.toml or DIARY_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from an explicit `--config` path, falling back to the default location
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Exactly what the file says, defaults for anything missing
    ///
    /// No environment overrides are applied, so the result is safe to edit
    /// and write back with [`save_to_path`](Self::save_to_path).
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // DIARY_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // DIARY_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        // DIARY_LINE_WIDTH, ignored unless it is a positive number
        if let Ok(val) = std::env::var(format!("{}_LINE_WIDTH", ENV_PREFIX)) {
            if let Ok(width) = val.parse::<usize>() {
                if width > 0 {
                    self.line_width = width;
                }
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with DIARY_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("diary")
            .join("config.toml")
    }

    /// Path of the entries blob
    pub fn entries_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.entries_key))
    }

    /// Path of the profile blob
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.profile_key))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("diary")
}

fn default_entries_key() -> String {
    "diaryEntries".to_string()
}

fn default_profile_key() -> String {
    "diaryData".to_string()
}

fn default_line_width() -> usize {
    80
}

fn default_lines_per_page() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &["DIARY_DATA_DIR", "DIARY_LOG_FILE", "DIARY_LINE_WIDTH"];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.ends_with("diary"));
        assert_eq!(config.entries_key, "diaryEntries");
        assert_eq!(config.profile_key, "diaryData");
        assert_eq!(config.line_width, 80);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_file_paths() {
        let config = Config::default();
        assert!(config.entries_path().ends_with("diaryEntries.json"));
        assert!(config.profile_path().ends_with("diaryData.json"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("DIARY_DATA_DIR", "/tmp/diary-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/diary-test"));
    }

    #[test]
    fn test_env_override_line_width() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("DIARY_LINE_WIDTH", "60");
        config.apply_env_overrides();
        assert_eq!(config.line_width, 60);

        // Nonsense and zero are ignored
        env::set_var("DIARY_LINE_WIDTH", "wide");
        config.apply_env_overrides();
        env::set_var("DIARY_LINE_WIDTH", "0");
        config.apply_env_overrides();
        assert_eq!(config.line_width, 60);
    }

    #[test]
    fn test_env_override_log_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("DIARY_LOG_FILE", "/tmp/diary.log");
        config.apply_env_overrides();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/diary.log")));

        // Empty string clears it
        env::set_var("DIARY_LOG_FILE", "");
        config.apply_env_overrides();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            line_width = 72
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.line_width, 72);
        assert_eq!(config.entries_key, "diaryEntries");
        assert_eq!(config.lines_per_page, 50);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            lines_per_page: 30,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.data_dir.exists());
    }

    #[test]
    fn test_load_file_ignores_env() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/from/file\"\nline_width = 72\n").unwrap();

        env::set_var("DIARY_DATA_DIR", "/from/env");
        env::set_var("DIARY_LINE_WIDTH", "100");

        let raw = Config::load_file(&path).unwrap();
        assert_eq!(raw.data_dir, PathBuf::from("/from/file"));
        assert_eq!(raw.line_width, 72);

        let effective = Config::load_from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(effective.data_dir, PathBuf::from("/from/env"));
        assert_eq!(effective.line_width, 100);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("DIARY_DATA_DIR", temp_dir.path().join("data"));

        let config = Config::load_from_path(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.line_width, 80);
        assert!(config.data_dir.exists());
    }
}
