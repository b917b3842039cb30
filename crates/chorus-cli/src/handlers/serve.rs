//! Serve command handler.

use std::path::Path;

use tracing::info;

use chorus_axum::{ServerConfig, start_server};
use chorus_core::{Settings, load_settings, resolve_settings_path};

use crate::error::CliError;

/// Resolve the settings file and load it.
pub fn load(config: Option<&Path>) -> Result<Settings, CliError> {
    let resolution = resolve_settings_path(config)?;
    info!(
        path = %resolution.path.display(),
        source = ?resolution.source,
        "Loading settings"
    );
    Ok(load_settings(&resolution.path)?)
}

/// Execute the serve command.
///
/// Runs until interrupted. Any configuration problem is fatal before the
/// server binds.
pub async fn execute(config: Option<&Path>, port: Option<u16>) -> Result<(), CliError> {
    let settings = load(config)?;

    let mut server = ServerConfig::from_settings(&settings);
    if let Some(port) = port {
        server = server.with_port(port);
    }

    start_server(&settings, server).await?;
    info!("Shut down");
    Ok(())
}
