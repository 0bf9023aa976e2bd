use anyhow::{Context, Result};
use repdeck_types::ColorScheme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::feed::{FeedSettings, AUTOPLAY_THRESHOLD};

/// Client preferences stored locally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: Option<String>,
    /// Keys the feed view swallows while it is open
    pub suppressed_keys: Vec<char>,
    /// Visibility ratio at which videos start playing
    pub autoplay_threshold: f32,
    /// Whether the playback environment permits autoplay at all
    pub autoplay_allowed: bool,
    /// Cards mounted on each side of the current one
    pub mount_radius: usize,
    pub color_scheme: ColorScheme,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            suppressed_keys: vec!['l'],
            autoplay_threshold: AUTOPLAY_THRESHOLD,
            autoplay_allowed: true,
            mount_radius: 1,
            color_scheme: ColorScheme::Default,
            last_updated: chrono::Utc::now(),
        }
    }
}

impl ClientConfig {
    pub fn feed_settings(&self) -> FeedSettings {
        let threshold = if self.autoplay_threshold.is_finite() {
            self.autoplay_threshold.clamp(0.0, 1.0)
        } else {
            AUTOPLAY_THRESHOLD
        };
        FeedSettings {
            autoplay_threshold: threshold,
            autoplay_allowed: self.autoplay_allowed,
            mount_radius: self.mount_radius,
        }
    }
}

/// Server configuration stored locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_url: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

/// Configuration manager for the .repdeck directory
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a config manager rooted at `~/.repdeck`
    pub fn new() -> Result<Self> {
        Self::with_dir(Self::get_config_dir()?)
    }

    /// Create a config manager rooted at `config_dir`, creating it if needed
    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create .repdeck directory")?;
        }
        Ok(Self { config_dir })
    }

    fn get_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home_dir.join(".repdeck"))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn get_client_config_file(&self) -> PathBuf {
        self.config_dir.join("client_config.json")
    }

    fn get_server_config_file(&self) -> PathBuf {
        self.config_dir.join("server_config.json")
    }

    pub fn save_client_config(&self, config: &ClientConfig) -> Result<()> {
        write_json(&self.get_client_config_file(), config)
            .context("Failed to write client config file")
    }

    /// Load client preferences, falling back to defaults when none are saved
    pub fn load_client_config(&self) -> Result<ClientConfig> {
        Ok(read_json(&self.get_client_config_file())
            .context("Failed to read client config")?
            .unwrap_or_default())
    }

    pub fn save_server_config(&self, config: &ServerConfig) -> Result<()> {
        write_json(&self.get_server_config_file(), config)
            .context("Failed to write server config file")
    }

    pub fn load_server_config(&self) -> Result<Option<ServerConfig>> {
        read_json(&self.get_server_config_file()).context("Failed to read server config")
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize config")?;
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    let value = serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (ConfigManager, TempDir) {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().join(".repdeck")).unwrap();
        (manager, dir)
    }

    #[test]
    fn test_missing_client_config_uses_defaults() {
        let (manager, _dir) = manager();
        let config = manager.load_client_config().unwrap();
        assert_eq!(config.suppressed_keys, vec!['l']);
        assert_eq!(config.autoplay_threshold, AUTOPLAY_THRESHOLD);
        assert!(manager.config_dir().exists());
    }

    #[test]
    fn test_client_config_persists() {
        let (manager, _dir) = manager();
        let config = ClientConfig {
            server_url: Some("http://localhost:8000".to_string()),
            suppressed_keys: vec!['l', 'x'],
            autoplay_threshold: 0.75,
            color_scheme: ColorScheme::Dark,
            ..ClientConfig::default()
        };
        manager.save_client_config(&config).unwrap();

        assert_eq!(manager.load_client_config().unwrap(), config);
    }

    #[test]
    fn test_partial_client_config_fills_defaults() {
        let (manager, _dir) = manager();
        fs::write(
            manager.config_dir().join("client_config.json"),
            r#"{"autoplay_allowed": false}"#,
        )
        .unwrap();

        let config = manager.load_client_config().unwrap();
        assert!(!config.autoplay_allowed);
        assert_eq!(config.mount_radius, 1);
    }

    #[test]
    fn test_corrupt_client_config_is_an_error() {
        let (manager, _dir) = manager();
        fs::write(manager.config_dir().join("client_config.json"), "not json").unwrap();
        assert!(manager.load_client_config().is_err());
    }

    #[test]
    fn test_feed_settings_clamp_threshold() {
        let config = ClientConfig {
            autoplay_threshold: 3.0,
            ..ClientConfig::default()
        };
        assert_eq!(config.feed_settings().autoplay_threshold, 1.0);

        let config = ClientConfig {
            autoplay_threshold: f32::NAN,
            ..ClientConfig::default()
        };
        assert_eq!(config.feed_settings().autoplay_threshold, AUTOPLAY_THRESHOLD);
    }
}
