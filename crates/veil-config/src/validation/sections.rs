//! Per-section validators.

use crate::schema::{VeilConfig, LOG_LEVELS};

use super::helpers::{validate_hex_color, validate_range, validate_range_f64};

pub(crate) fn validate_window(errors: &mut Vec<String>, config: &VeilConfig) {
    validate_range(errors, "window.width", config.window.width, 64, 8192);
    validate_range(errors, "window.height", config.window.height, 64, 8192);
}

pub(crate) fn validate_blur(errors: &mut Vec<String>, config: &VeilConfig) {
    validate_range(errors, "blur.radius", config.blur.radius, 1, 62);
    validate_range_f64(errors, "blur.sigma", config.blur.sigma, 0.1, 100.0);
}

pub(crate) fn validate_background(errors: &mut Vec<String>, config: &VeilConfig) {
    validate_hex_color(errors, "background.primary", &config.background.primary);
    validate_hex_color(errors, "background.secondary", &config.background.secondary);
    validate_range(errors, "background.cell_size", config.background.cell_size, 4, 512);
    validate_range_f64(
        errors,
        "background.animation_speed",
        config.background.animation_speed,
        0.0,
        10.0,
    );
}

pub(crate) fn validate_logging(errors: &mut Vec<String>, config: &VeilConfig) {
    let level = config.logging.level.to_ascii_uppercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }
}
