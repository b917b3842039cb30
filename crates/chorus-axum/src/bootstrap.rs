//! Axum server bootstrap - the composition root.
//!
//! This module is the only place where the speech engine, the queue manager
//! and the HTTP router are wired together.

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use chorus_core::{Settings, SpeechQueuePort};
use chorus_speech::{SpeechService, backend_for};

use crate::routes::create_router;

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
}

impl ServerConfig {
    /// Listen address and port from the settings file.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
        }
    }

    /// Override the port (e.g. from `serve --port`).
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The speech queue manager.
    pub speech: Arc<dyn SpeechQueuePort>,
}

impl AxumContext {
    pub fn new(speech: Arc<dyn SpeechQueuePort>) -> Self {
        Self { speech }
    }
}

/// Build the speech engine and start the queue manager.
///
/// Fails when a configured voice is missing under the strict voice policy.
pub async fn bootstrap(settings: &Settings) -> Result<SpeechService> {
    let backend = backend_for(settings.engine, settings.engine_binary.clone());
    info!(
        engine = backend.name(),
        program = ?settings.engine_binary,
        "Starting speech engine"
    );

    SpeechService::spawn(settings, backend.as_ref())
        .await
        .context("Failed to configure speech channels")
}

/// Start the HTTP server and run until interrupted.
///
/// On Ctrl-C all speech is stopped and the function returns.
pub async fn start_server(settings: &Settings, config: ServerConfig) -> Result<()> {
    let speech = bootstrap(settings).await?;
    let app = create_router(AxumContext::new(Arc::new(speech.clone())));

    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("chorus listening on http://{}", listener.local_addr()?);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            result.context("HTTP server failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, stopping speech");
        }
    }

    speech.stop_speaking().await?;
    // The actor handles commands in order: once the snapshot arrives the stop
    // has been applied.
    if let Err(e) = speech.snapshot().await {
        warn!(error = %e, "Speech service already stopped");
    }
    Ok(())
}
