//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = VeilConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_blur_radius_zero() {
    let mut config = VeilConfig::default();
    config.blur.radius = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("blur.radius"));
}

#[test]
fn catches_blur_radius_too_large() {
    let mut config = VeilConfig::default();
    config.blur.radius = 63;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("blur.radius"));
}

#[test]
fn accepts_blur_radius_bounds() {
    let mut config = VeilConfig::default();
    config.blur.radius = 1;
    assert!(validate(&config).is_ok());
    config.blur.radius = 62;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_sigma_out_of_range() {
    let mut config = VeilConfig::default();
    config.blur.sigma = 0.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("blur.sigma"));
}

#[test]
fn catches_sigma_nan() {
    let mut config = VeilConfig::default();
    config.blur.sigma = f64::NAN;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("blur.sigma"));
}

#[test]
fn catches_window_too_small() {
    let mut config = VeilConfig::default();
    config.window.width = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
}

#[test]
fn catches_bad_background_color() {
    let mut config = VeilConfig::default();
    config.background.primary = "purple".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("background.primary"));
}

#[test]
fn catches_unknown_log_level() {
    let mut config = VeilConfig::default();
    config.logging.level = "TRACE".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("logging.level"));
}

#[test]
fn log_level_is_case_insensitive() {
    let mut config = VeilConfig::default();
    config.logging.level = "debug".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn collects_multiple_errors() {
    let mut config = VeilConfig::default();
    config.blur.radius = 0;
    config.window.height = 9000;
    config.background.cell_size = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("blur.radius"));
    assert!(err.contains("window.height"));
    assert!(err.contains("background.cell_size"));
}
