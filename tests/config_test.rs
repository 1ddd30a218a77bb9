//! Configuration file tests

use hand_volume_control::{
    config::{Config, EXAMPLE_CONFIG},
    Error,
};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hand_volume_control_{}_{name}", std::process::id()))
}

#[test]
fn test_round_trip_through_file() {
    let path = temp_path("round_trip.yaml");

    let mut config = Config::default();
    config.camera.device_index = 0;
    config.camera.mirror = true;
    config.mapping.distance_max = 240.0;
    config.filter.kind = "kalman".to_string();
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_example_config_is_valid() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.camera.width, 1280);
    assert_eq!(config.camera.height, 720);
    assert_eq!(config.detection.confidence, 0.75);
    assert_eq!(config.display.window_name, "Img");
}

#[test]
fn test_missing_file() {
    let result = Config::from_file(temp_path("missing.yaml"));
    assert!(matches!(result, Err(Error::IoError(_))));
}

#[test]
fn test_filter_from_config() {
    let mut config = Config::default();
    assert_eq!(config.create_filter().unwrap().name(), "NoFilter");

    config.filter.kind = "moving_average".to_string();
    config.filter.moving_average_window = 3;
    let mut filter = config.create_filter().unwrap();
    filter.apply(90.0);
    filter.apply(120.0);
    assert_eq!(filter.apply(150.0), 120.0);
    // Oldest sample leaves the window
    assert_eq!(filter.apply(180.0), 150.0);

    config.filter.kind = "exponential:0.25".to_string();
    assert!(config.create_filter().is_ok());
}

#[test]
fn test_custom_calibration() {
    let config = Config::from_yaml("mapping:\n  distance_min: 0.0\n  distance_max: 100.0\n").unwrap();
    let mapper = config.create_mapper().unwrap();
    assert_eq!(mapper.domain(), (0.0, 100.0));
    assert_eq!(mapper.map_to_percent(25.0), 25.0);
}

#[test]
fn test_invalid_resolution() {
    let mut config = Config::default();
    config.camera.width = 0;
    match config.validate() {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("resolution")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_unknown_volume_output() {
    let mut config = Config::default();
    config.volume.output = "alsa".to_string();
    assert!(config.validate().is_err());
}
