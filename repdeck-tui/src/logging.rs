use log::LevelFilter;
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;

/// Log targets used by the feed engine and the TUI host
pub mod targets {
    pub const NAVIGATION: &str = "navigation";
    pub const AUTOPLAY: &str = "autoplay";
    pub const LIKES: &str = "likes";
    pub const API_CALLS: &str = "api_calls";
    pub const KEY_EVENTS: &str = "key_events";
    pub const RENDERING: &str = "rendering";
    pub const GENERAL: &str = "general";
}

/// Logging configuration for the RepDeck TUI
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Master switch to enable/disable all logging
    pub enabled: bool,
    /// Path to the log file
    pub log_file: PathBuf,
    /// Whether to clear the log file on startup
    pub clear_on_startup: bool,
    /// Feature flags for specific logging categories
    pub features: LogFeatures,
    /// Overall log level
    pub level: LevelFilter,
}

/// Feature flags for specific logging categories
#[derive(Debug, Clone, PartialEq)]
pub struct LogFeatures {
    /// Card, panel and gallery index changes
    pub navigation: bool,
    /// Visibility crossings and playback commands
    pub autoplay: bool,
    /// Optimistic like lifecycle
    pub likes: bool,
    pub api_calls: bool,
    pub key_events: bool,
    pub rendering: bool,
    pub general: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("repdeck_debug.log"),
            clear_on_startup: true,
            features: LogFeatures::default(),
            level: LevelFilter::Info,
        }
    }
}

impl Default for LogFeatures {
    fn default() -> Self {
        Self::all(true)
    }
}

impl LogFeatures {
    fn all(on: bool) -> Self {
        Self {
            navigation: on,
            autoplay: on,
            likes: on,
            api_calls: on,
            key_events: on,
            rendering: on,
            general: on,
        }
    }

    /// Targets whose records should be dropped
    pub fn disabled_targets(&self) -> Vec<&'static str> {
        [
            (self.navigation, targets::NAVIGATION),
            (self.autoplay, targets::AUTOPLAY),
            (self.likes, targets::LIKES),
            (self.api_calls, targets::API_CALLS),
            (self.key_events, targets::KEY_EVENTS),
            (self.rendering, targets::RENDERING),
            (self.general, targets::GENERAL),
        ]
        .into_iter()
        .filter(|(on, _)| !on)
        .map(|(_, target)| target)
        .collect()
    }
}

impl LogConfig {
    /// Create a new log configuration with all features disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Create a minimal log configuration (only errors and warnings)
    pub fn minimal() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Warn,
            features: LogFeatures::all(false),
            ..Default::default()
        }
    }

    /// Create a verbose log configuration (all features, every level)
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LevelFilter::Trace,
            features: LogFeatures::all(true),
            ..Default::default()
        }
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    if config.clear_on_startup {
        let _ = File::create(&config.log_file)?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let mut builder = ConfigBuilder::new();
    builder.set_time_format_rfc3339();
    // Stays on UTC when the local offset cannot be determined
    let _ = builder.set_time_offset_to_local();
    for target in config.features.disabled_targets() {
        builder.add_filter_ignore_str(target);
    }

    WriteLogger::init(config.level, builder.build(), log_file)?;

    log::info!("Logging initialized: file={}, level={:?}", config.log_file.display(), config.level);
    log::debug!(target: targets::GENERAL, "Log features: {:?}", config.features);

    Ok(())
}

/// Macro for logging key events
#[macro_export]
macro_rules! log_key_event {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.key_events {
            log::debug!(target: $crate::logging::targets::KEY_EVENTS, $($arg)*);
        }
    };
}

/// Macro for logging rendering operations
#[macro_export]
macro_rules! log_rendering {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.rendering {
            log::trace!(target: $crate::logging::targets::RENDERING, $($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(!LogConfig::disabled().enabled);
        assert_eq!(LogConfig::minimal().level, LevelFilter::Warn);
        assert_eq!(LogConfig::verbose().level, LevelFilter::Trace);
        assert_eq!(LogConfig::default().log_file, PathBuf::from("repdeck_debug.log"));
    }

    #[test]
    fn test_disabled_targets() {
        assert!(LogFeatures::default().disabled_targets().is_empty());
        assert_eq!(LogFeatures::all(false).disabled_targets().len(), 7);

        let features = LogFeatures {
            autoplay: false,
            key_events: false,
            ..LogFeatures::default()
        };
        assert_eq!(
            features.disabled_targets(),
            vec![targets::AUTOPLAY, targets::KEY_EVENTS]
        );
    }
}
