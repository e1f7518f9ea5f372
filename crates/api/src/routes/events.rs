//! Event ingestion into the in-memory channel.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use event_channel::EventEnvelope;
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedResponse {
    pub event_id: String,
}

/// POST /events — enqueues an envelope for the projector.
///
/// Acceptance only means the event is queued. Whether it decodes and whether
/// the read view takes it is decided later, and a read straight after this
/// call may not reflect it.
pub async fn publish(
    State(state): State<Arc<AppState>>,
    Json(envelope): Json<EventEnvelope>,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    let event_id = envelope.event_id.to_string();
    state.publisher.publish(envelope).await?;
    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse { event_id })))
}
