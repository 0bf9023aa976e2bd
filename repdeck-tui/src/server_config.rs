use crate::config::{ConfigManager, ServerConfig};
use anyhow::Result;

/// Backend the client talks to when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

pub const SERVER_URL_ENV: &str = "REPDECK_SERVER_URL";

/// Server configuration utility for managing server URL settings
pub struct ServerConfigManager {
    config_manager: ConfigManager,
}

impl ServerConfigManager {
    pub fn new() -> Result<Self> {
        Ok(Self::with_config_manager(ConfigManager::new()?))
    }

    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Determine the server URL to use based on priority:
    /// 1. CLI argument (highest priority)
    /// 2. Environment variable REPDECK_SERVER_URL
    /// 3. Saved configuration file
    /// 4. Built-in default
    pub fn determine_server_url(&self, cli_override: Option<String>) -> Result<String> {
        self.resolve(cli_override, std::env::var(SERVER_URL_ENV).ok())
    }

    fn resolve(&self, cli_override: Option<String>, env_value: Option<String>) -> Result<String> {
        if let Some(url) = cli_override.filter(|url| !url.trim().is_empty()) {
            return Ok(url);
        }

        if let Some(url) = env_value.filter(|url| !url.trim().is_empty()) {
            return Ok(url);
        }

        if let Some(config) = self.config_manager.load_server_config()? {
            return Ok(config.server_url);
        }

        Ok(DEFAULT_SERVER_URL.to_string())
    }

    pub fn save_server_url(&self, server_url: String) -> Result<()> {
        let config = ServerConfig {
            server_url,
            last_updated: chrono::Utc::now(),
        };
        self.config_manager.save_server_config(&config)
    }

    /// Display-friendly description of `current_url`
    pub fn get_server_description(&self, current_url: &str) -> String {
        let local = current_url.contains("localhost") || current_url.contains("127.0.0.1");
        match (current_url == DEFAULT_SERVER_URL, local) {
            (true, _) => "Local Development Server (default)".to_string(),
            (false, true) => "Local Development Server (custom)".to_string(),
            (false, false) => "Custom Server".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (ServerConfigManager, TempDir) {
        let dir = TempDir::new().unwrap();
        let config_manager = ConfigManager::with_dir(dir.path().to_path_buf()).unwrap();
        (ServerConfigManager::with_config_manager(config_manager), dir)
    }

    #[test]
    fn test_default_server_url() {
        let (manager, _dir) = manager();
        assert_eq!(manager.resolve(None, None).unwrap(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_cli_override_priority() {
        let (manager, _dir) = manager();
        manager.save_server_url("http://saved:8000".to_string()).unwrap();

        let url = manager
            .resolve(
                Some("http://cli-override:8000".to_string()),
                Some("http://env-override:8000".to_string()),
            )
            .unwrap();
        assert_eq!(url, "http://cli-override:8000");
    }

    #[test]
    fn test_env_var_beats_saved_file() {
        let (manager, _dir) = manager();
        manager.save_server_url("http://saved:8000".to_string()).unwrap();

        let url = manager
            .resolve(None, Some("http://env-override:8000".to_string()))
            .unwrap();
        assert_eq!(url, "http://env-override:8000");
    }

    #[test]
    fn test_saved_file_beats_default() {
        let (manager, _dir) = manager();
        manager.save_server_url("http://saved:8000".to_string()).unwrap();
        assert_eq!(manager.resolve(None, None).unwrap(), "http://saved:8000");
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let (manager, _dir) = manager();
        let url = manager.resolve(Some("  ".to_string()), Some(String::new())).unwrap();
        assert_eq!(url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_server_description() {
        let (manager, _dir) = manager();
        assert!(manager.get_server_description(DEFAULT_SERVER_URL).contains("default"));
        assert!(manager
            .get_server_description("http://localhost:3000")
            .contains("Local Development"));
        assert_eq!(manager.get_server_description("https://repdeck.example.com"), "Custom Server");
    }
}
