//! Settings path resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV_VAR: &str = "CHORUS_CONFIG";

/// File name of the settings file inside [`config_root`].
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// How the settings path was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPathSource {
    /// The user passed `--config`.
    Explicit,
    /// The path came from `CHORUS_CONFIG`.
    EnvVar,
    /// Fallback default under the platform config directory.
    Default,
}

/// Resolution result for the settings file.
#[derive(Debug, Clone)]
pub struct SettingsPathResolution {
    pub path: PathBuf,
    pub source: SettingsPathSource,
}

/// `<platform config dir>/chorus`.
pub fn config_root() -> Result<PathBuf, PathError> {
    let base = dirs::config_dir().ok_or(PathError::NoConfigDir)?;
    Ok(base.join("chorus"))
}

/// Default settings file location.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join(SETTINGS_FILE_NAME))
}

/// Resolve the settings file from an explicit override, env var, or default.
///
/// Resolution order:
/// 1. Explicit path provided by caller
/// 2. `CHORUS_CONFIG` environment variable
/// 3. [`settings_path`]
pub fn resolve_settings_path(explicit: Option<&Path>) -> Result<SettingsPathResolution, PathError> {
    resolve_settings_path_from(explicit, env::var(CONFIG_ENV_VAR).ok())
}

/// Same as [`resolve_settings_path`], with the environment value supplied.
pub fn resolve_settings_path_from(
    explicit: Option<&Path>,
    env_value: Option<String>,
) -> Result<SettingsPathResolution, PathError> {
    if let Some(path) = explicit {
        return Ok(SettingsPathResolution {
            path: normalize_user_path(&path.to_string_lossy())?,
            source: SettingsPathSource::Explicit,
        });
    }

    if let Some(env_path) = env_value.filter(|value| !value.trim().is_empty()) {
        return Ok(SettingsPathResolution {
            path: normalize_user_path(&env_path)?,
            source: SettingsPathSource::EnvVar,
        });
    }

    Ok(SettingsPathResolution {
        path: settings_path()?,
        source: SettingsPathSource::Default,
    })
}

/// Trim the input and expand a leading `~`.
fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    if trimmed == "~" {
        return dirs::home_dir().ok_or(PathError::NoHomeDir);
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(trimmed))
}
