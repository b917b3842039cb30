//! `POST /speak`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;

use chorus_core::{SpeechQueuePort, UtteranceRequest};

use crate::error::HttpError;
use crate::state::AppState;

/// `POST /speak`
///
/// The body is decoded by hand rather than through `Json` so that an empty
/// body or a missing content type is a 422 like any other decoding failure.
pub async fn speak(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, HttpError> {
    let requests = decode_batch(&body)?;
    debug!(target: "chorus.http", items = requests.len(), "Speak request");
    state.speech.schedule(requests).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Decode a speak request body into a batch of utterances.
pub fn decode_batch(body: &[u8]) -> Result<Vec<UtteranceRequest>, HttpError> {
    if body.is_empty() {
        return Err(HttpError::Unprocessable("empty body".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| HttpError::Unprocessable(e.to_string()))
}
