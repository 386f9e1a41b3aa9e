//! Validation and parsing of layout settings snapshots.

use danmaku_protocol::Settings;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("rows must be at least 1")]
    NoRows,
    #[error("speed must be a positive number of seconds, got {0}")]
    Speed(f64),
    #[error("opacity must be in (0, 1], got {0}")]
    Opacity(f64),
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Check that a snapshot describes a usable layout.
pub fn validate(settings: &Settings) -> Result<(), SettingsError> {
    if settings.rows == 0 {
        return Err(SettingsError::NoRows);
    }
    if !(settings.speed.is_finite() && settings.speed > 0.0) {
        return Err(SettingsError::Speed(settings.speed));
    }
    if !(settings.opacity > 0.0 && settings.opacity <= 1.0) {
        return Err(SettingsError::Opacity(settings.opacity));
    }
    Ok(())
}

/// Parse and validate a JSON settings snapshot. Missing fields take their
/// defaults.
pub fn from_json(json: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = serde_json::from_str(json)?;
    validate(&settings)?;
    Ok(settings)
}
