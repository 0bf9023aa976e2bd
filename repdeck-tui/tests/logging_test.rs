use repdeck::logging::{init_logging, targets, LogConfig, LogFeatures};
use std::fs;

// The logger is process-global, so this binary holds a single test.
#[test]
fn test_disabled_features_are_filtered_from_log_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let log_file = dir.path().join("repdeck_debug.log");
    fs::write(&log_file, "stale line from a previous run\n").unwrap();

    let config = LogConfig {
        log_file: log_file.clone(),
        level: log::LevelFilter::Debug,
        features: LogFeatures {
            autoplay: false,
            ..LogFeatures::default()
        },
        ..LogConfig::default()
    };
    init_logging(&config).unwrap();

    log::debug!(target: targets::AUTOPLAY, "card 1 visibility 0.70 -> Play");
    log::debug!(target: targets::LIKES, "like #1 post=5 confirmed");
    log::warn!("Failed to toggle like #2 on post 5");
    log::trace!(target: targets::NAVIGATION, "below the configured level");
    log::logger().flush();

    let contents = fs::read_to_string(&log_file).unwrap();
    assert!(!contents.contains("stale line"), "log is cleared on startup");
    assert!(contents.contains("Logging initialized"));
    assert!(contents.contains("like #1 post=5 confirmed"));
    assert!(contents.contains("Failed to toggle like #2"));
    assert!(!contents.contains("visibility 0.70"));
    assert!(!contents.contains("below the configured level"));
}
