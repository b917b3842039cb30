//! Axum-specific error types and mappings.
//!
//! `/speak` answers with a bare status code, so errors map to a status and
//! nothing else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, warn};

use chorus_core::SpeechPortError;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request body is empty or not a batch of utterances.
    #[error("Unprocessable request body: {0}")]
    Unprocessable(String),

    /// The speech queue manager is not accepting work.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match &self {
            Self::Unprocessable(reason) => debug!(target: "chorus.http", %reason, "Rejected request"),
            Self::ServiceUnavailable(reason) => warn!(target: "chorus.http", %reason, "Request failed"),
        }
        self.status().into_response()
    }
}

impl From<SpeechPortError> for HttpError {
    fn from(err: SpeechPortError) -> Self {
        match err {
            SpeechPortError::Stopped => Self::ServiceUnavailable(err.to_string()),
        }
    }
}
