//! /hosts handlers — list, add, update, delete.
//!
//! Adding or updating with an empty hardware address triggers a synchronous
//! resolution attempt; its outcome rides along as an informational message
//! and never blocks the write.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use rouse_core::Host;
use rouse_services::{HostPatch, NewHost, Resolution};

use super::ApiState;

/// A host plus the optional resolution message for this request.
#[derive(Debug, Serialize)]
pub struct HostResponse {
    #[serde(flatten)]
    pub host: Host,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ── GET /hosts ────────────────────────────────────────────────────────────────

pub async fn handle_list(State(state): State<ApiState>) -> Json<Vec<Host>> {
    Json(state.registry.list())
}

// ── POST /hosts ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddHostRequest {
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub name: Option<String>,
    pub owner: Option<String>,
}

pub async fn handle_add(
    State(state): State<ApiState>,
    Json(req): Json<AddHostRequest>,
) -> Result<Json<HostResponse>, (StatusCode, String)> {
    let ip = req.ip.as_deref().unwrap_or("").trim().to_string();
    if ip.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "network address is required".to_string(),
        ));
    }

    let supplied = req.mac.as_deref().unwrap_or("").trim().to_string();
    let (mac, message) = if supplied.is_empty() {
        match state.resolver.resolve(&ip).await {
            Resolution::Resolved(mac) => {
                let msg = format!("hardware address resolved to {mac}");
                (mac, Some(msg))
            }
            Resolution::Failed(reason) => (String::new(), Some(reason)),
        }
    } else {
        (supplied, None)
    };

    let host = state.registry.add(NewHost {
        ip,
        mac,
        name: req.name,
        owner: req.owner,
    });

    Ok(Json(HostResponse { host, message }))
}

// ── PUT /hosts/{id} ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateHostRequest {
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub name: Option<String>,
    pub owner: Option<String>,
}

pub async fn handle_update(
    State(state): State<ApiState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateHostRequest>,
) -> Result<Json<HostResponse>, (StatusCode, String)> {
    let existing = state
        .registry
        .get(id)
        .ok_or((StatusCode::NOT_FOUND, format!("host {id} not found")))?;

    // blank ip patches are ignored; the resolver must see the address being
    // written, not the stale one
    let ip_patch = req
        .ip
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty());
    let effective_ip = ip_patch.clone().unwrap_or_else(|| existing.ip.clone());

    // empty string asks for re-resolution; non-empty is stored verbatim
    let (mac, message) = match req.mac.as_deref().map(str::trim) {
        None => (None, None),
        Some("") => match state.resolver.resolve(&effective_ip).await {
            Resolution::Resolved(mac) => {
                let msg = format!("hardware address resolved to {mac}");
                (Some(mac), Some(msg))
            }
            Resolution::Failed(reason) => (Some(String::new()), Some(reason)),
        },
        Some(mac) => (Some(mac.to_string()), None),
    };

    let host = state
        .registry
        .update(
            id,
            HostPatch {
                ip: ip_patch,
                mac,
                name: req.name,
                owner: req.owner,
            },
        )
        .ok_or((StatusCode::NOT_FOUND, format!("host {id} not found")))?;

    Ok(Json(HostResponse { host, message }))
}

// ── DELETE /hosts/{id} ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub async fn handle_delete(
    State(state): State<ApiState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>, (StatusCode, String)> {
    if !state.registry.delete(id) {
        return Err((StatusCode::NOT_FOUND, format!("host {id} not found")));
    }
    Ok(Json(DeleteResponse { success: true }))
}
