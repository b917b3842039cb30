//! Settings file location.
//!
//! The settings file lives at `<config dir>/chorus/settings.json` unless the
//! caller or the `CHORUS_CONFIG` environment variable points elsewhere.

mod config;
mod error;

pub use config::{
    CONFIG_ENV_VAR, SETTINGS_FILE_NAME, SettingsPathResolution, SettingsPathSource, config_root,
    resolve_settings_path, resolve_settings_path_from, settings_path,
};
pub use error::PathError;
