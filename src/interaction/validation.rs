use crate::error::{ConfigError, ConfigResult};

use super::hover::HoverConfig;
use super::pan::PanConfig;
use super::selection::SelectionConfig;
use super::zoom::ZoomConfig;

const ZOOM: &str = "zoom";
const PAN: &str = "pan";
const HOVER: &str = "hover";
const SELECTION: &str = "selection";

pub(super) fn validate_zoom_config(config: &ZoomConfig) -> ConfigResult<()> {
    if !config.speed.is_finite() || config.speed <= 0.0 {
        return Err(ConfigError::invalid(ZOOM, "speed must be finite and > 0"));
    }
    if !config.min_zoom.is_finite() || config.min_zoom <= 0.0 {
        return Err(ConfigError::invalid(ZOOM, "min_zoom must be finite and > 0"));
    }
    if !config.max_zoom.is_finite() || config.max_zoom <= 0.0 {
        return Err(ConfigError::invalid(ZOOM, "max_zoom must be finite and > 0"));
    }
    if config.min_zoom > config.max_zoom {
        return Err(ConfigError::invalid(
            ZOOM,
            format!(
                "min_zoom ({}) must not exceed max_zoom ({})",
                config.min_zoom, config.max_zoom
            ),
        ));
    }
    if !config.zoom_padding.is_finite() || !(0.0..0.5).contains(&config.zoom_padding) {
        return Err(ConfigError::invalid(
            ZOOM,
            "zoom_padding must be finite and in [0, 0.5)",
        ));
    }
    Ok(())
}

pub(super) fn validate_pan_config(config: &PanConfig) -> ConfigResult<()> {
    if !config.friction.is_finite() || config.friction <= 0.0 || config.friction >= 1.0 {
        return Err(ConfigError::invalid(
            PAN,
            "friction must be finite and in (0, 1)",
        ));
    }
    if !config.min_velocity.is_finite() || config.min_velocity <= 0.0 {
        return Err(ConfigError::invalid(
            PAN,
            "min_velocity must be finite and > 0",
        ));
    }
    if !config.velocity_smoothing.is_finite()
        || config.velocity_smoothing <= 0.0
        || config.velocity_smoothing > 1.0
    {
        return Err(ConfigError::invalid(
            PAN,
            "velocity_smoothing must be finite and in (0, 1]",
        ));
    }
    if !config.pan_padding.is_finite() || config.pan_padding < 0.0 {
        return Err(ConfigError::invalid(
            PAN,
            "pan_padding must be finite and >= 0",
        ));
    }
    Ok(())
}

pub(super) fn validate_hover_config(config: &HoverConfig) -> ConfigResult<()> {
    if !config.max_distance.is_finite() || config.max_distance < 0.0 {
        return Err(ConfigError::invalid(
            HOVER,
            "max_distance must be finite and >= 0",
        ));
    }
    if !config.debounce_ms.is_finite() || config.debounce_ms < 0.0 {
        return Err(ConfigError::invalid(
            HOVER,
            "debounce_ms must be finite and >= 0",
        ));
    }
    if !config.tooltip_offset.is_finite() {
        return Err(ConfigError::invalid(HOVER, "tooltip_offset must be finite"));
    }
    config.tooltip_style.validate(HOVER)
}

pub(super) fn validate_selection_config(config: &SelectionConfig) -> ConfigResult<()> {
    if !config.click_radius.is_finite() || config.click_radius < 0.0 {
        return Err(ConfigError::invalid(
            SELECTION,
            "click_radius must be finite and >= 0",
        ));
    }
    Ok(())
}
