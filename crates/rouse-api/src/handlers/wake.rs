//! /wake handler — trigger a magic packet for a hardware address.
//!
//! Works on any address, registered or not, and never touches the registry.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use rouse_services::WakeError;

use super::ApiState;

#[derive(Deserialize)]
pub struct WakeRequest {
    pub mac: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WakeResponse {
    pub message: String,
}

pub async fn handle_wake(
    State(state): State<ApiState>,
    Json(req): Json<WakeRequest>,
) -> Result<Json<WakeResponse>, (StatusCode, String)> {
    let mac = req.mac.as_deref().unwrap_or("").trim().to_string();

    match state.waker.wake(&mac).await {
        Ok(()) => Ok(Json(WakeResponse {
            message: format!("wake signal sent to {mac}"),
        })),
        Err(e @ (WakeError::Empty | WakeError::Malformed(_))) => {
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e @ WakeError::Send(_)) => {
            tracing::warn!(mac = %mac, error = %e, "wake transmission failed");
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}
