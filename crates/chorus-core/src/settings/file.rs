//! Reading the settings file from disk.

use std::path::Path;

use tracing::debug;

use super::{Settings, SettingsError, validate_settings};

/// Load and validate settings from a JSON file.
///
/// A missing file is an error: the daemon has no useful behaviour without a
/// channel configuration it can point the user at.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: Settings =
        serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    validate_settings(&settings)?;

    debug!(
        path = %path.display(),
        channels = settings.channels.len(),
        engine = settings.engine.as_str(),
        "Loaded settings"
    );
    Ok(settings)
}

/// Parse and validate settings from a JSON string.
pub fn parse_settings(json: &str) -> Result<Settings, SettingsError> {
    let settings: Settings =
        serde_json::from_str(json).map_err(|source| SettingsError::Parse {
            path: "<inline>".into(),
            source,
        })?;
    validate_settings(&settings)?;
    Ok(settings)
}
