//! HTTP handler behavior, driven directly with fake collaborators.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use rouse_api::handlers::hosts::{
    handle_add, handle_delete, handle_update, AddHostRequest, UpdateHostRequest,
};
use rouse_api::handlers::wake::{handle_wake, WakeRequest};
use rouse_api::ApiState;
use rouse_services::{HostRegistry, MacResolver, WakeSender};

use crate::{ScriptedProbe, ScriptedTable};

fn state_with_table(table: &[(&str, &str)]) -> ApiState {
    state_with(ScriptedProbe::uniform(true), table, 9)
}

fn state_with(probe: ScriptedProbe, table: &[(&str, &str)], wake_port: u16) -> ApiState {
    ApiState {
        registry: HostRegistry::new(),
        resolver: Arc::new(MacResolver::new(
            Arc::new(probe),
            Arc::new(ScriptedTable::new(table)),
            Duration::from_millis(1),
        )),
        waker: Arc::new(WakeSender::new("127.0.0.1".parse().unwrap(), wake_port)),
    }
}

fn add_req(ip: &str, mac: Option<&str>) -> AddHostRequest {
    AddHostRequest {
        ip: Some(ip.into()),
        mac: mac.map(Into::into),
        name: None,
        owner: None,
    }
}

fn patch() -> UpdateHostRequest {
    UpdateHostRequest {
        ip: None,
        mac: None,
        name: None,
        owner: None,
    }
}

// ── add ───────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_without_mac_resolves_and_attaches_message() {
    let state = state_with_table(&[("192.168.1.10", "aa:bb:cc:dd:ee:ff")]);

    let resp = handle_add(State(state), Json(add_req("192.168.1.10", None)))
        .await
        .unwrap();
    assert_eq!(resp.0.host.mac, "aa:bb:cc:dd:ee:ff");
    assert!(resp.0.message.unwrap().contains("aa:bb:cc:dd:ee:ff"));
}

#[tokio::test]
async fn add_with_zero_mac_binding_stores_empty_with_warning() {
    let state = state_with_table(&[("192.168.1.10", "00:00:00:00:00:00")]);

    let resp = handle_add(State(state.clone()), Json(add_req("192.168.1.10", None)))
        .await
        .unwrap();
    assert_eq!(resp.0.host.mac, "");
    assert!(resp.0.message.is_some());
    // the write itself still landed
    assert_eq!(state.registry.len(), 1);
}

#[tokio::test]
async fn add_with_supplied_mac_skips_resolution() {
    // an empty table would fail any resolution attempt; a supplied MAC
    // must not trigger one
    let state = state_with_table(&[]);

    let resp = handle_add(
        State(state),
        Json(add_req("192.168.1.10", Some(" 11:22:33:44:55:66 "))),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.host.mac, "11:22:33:44:55:66");
    assert!(resp.0.message.is_none());
}

#[tokio::test]
async fn add_without_ip_is_rejected() {
    let state = state_with_table(&[]);
    let err = handle_add(
        State(state),
        Json(AddHostRequest {
            ip: None,
            mac: None,
            name: None,
            owner: None,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
}

// ── update ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_with_empty_mac_re_resolves() {
    let state = state_with_table(&[("192.168.1.10", "aa:bb:cc:dd:ee:ff")]);
    let host = handle_add(
        State(state.clone()),
        Json(add_req("192.168.1.10", Some("11:22:33:44:55:66"))),
    )
    .await
    .unwrap()
    .0
    .host;

    let resp = handle_update(
        State(state),
        Path(host.id),
        Json(UpdateHostRequest {
            mac: Some(String::new()),
            ..patch()
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.host.mac, "aa:bb:cc:dd:ee:ff");
    assert!(resp.0.message.is_some());
}

#[tokio::test]
async fn update_with_new_ip_and_empty_mac_resolves_against_new_ip() {
    let state = state_with_table(&[("10.0.0.9", "aa:bb:cc:dd:ee:ff")]);
    let host = handle_add(
        State(state.clone()),
        Json(add_req("192.168.1.10", Some("11:22:33:44:55:66"))),
    )
    .await
    .unwrap()
    .0
    .host;

    let resp = handle_update(
        State(state),
        Path(host.id),
        Json(UpdateHostRequest {
            ip: Some("10.0.0.9".into()),
            mac: Some(String::new()),
            ..patch()
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.host.ip, "10.0.0.9");
    assert_eq!(resp.0.host.mac, "aa:bb:cc:dd:ee:ff");
}

#[tokio::test]
async fn update_with_nonempty_mac_stores_verbatim_trimmed() {
    let state = state_with_table(&[("192.168.1.10", "aa:bb:cc:dd:ee:ff")]);
    let host = handle_add(State(state.clone()), Json(add_req("192.168.1.10", None)))
        .await
        .unwrap()
        .0
        .host;

    let resp = handle_update(
        State(state),
        Path(host.id),
        Json(UpdateHostRequest {
            mac: Some("  11:22:33:44:55:66  ".into()),
            ..patch()
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.0.host.mac, "11:22:33:44:55:66");
    assert!(resp.0.message.is_none());
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let state = state_with_table(&[]);
    let err = handle_update(State(state), Path(42), Json(patch()))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
}

// ── delete ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_known_id_succeeds() {
    let state = state_with_table(&[]);
    let host = handle_add(
        State(state.clone()),
        Json(add_req("10.0.0.1", Some("11:22:33:44:55:66"))),
    )
    .await
    .unwrap()
    .0
    .host;

    let resp = handle_delete(State(state.clone()), Path(host.id))
        .await
        .unwrap();
    assert!(resp.0.success);
    assert!(state.registry.is_empty());
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let state = state_with_table(&[]);
    let err = handle_delete(State(state), Path(42)).await.unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
}

// ── wake ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn wake_without_mac_is_invalid_input() {
    let state = state_with_table(&[]);
    let err = handle_wake(State(state), Json(WakeRequest { mac: None }))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wake_with_malformed_mac_is_invalid_input() {
    let state = state_with_table(&[]);
    let err = handle_wake(
        State(state),
        Json(WakeRequest {
            mac: Some("nope".into()),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wake_reports_success_for_deliverable_packet() {
    let listener = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let state = state_with(ScriptedProbe::uniform(true), &[], port);

    let resp = handle_wake(
        State(state),
        Json(WakeRequest {
            mac: Some("aa:bb:cc:dd:ee:ff".into()),
        }),
    )
    .await
    .unwrap();
    assert!(resp.0.message.contains("aa:bb:cc:dd:ee:ff"));

    let mut buf = [0u8; 256];
    let (n, _) = tokio::time::timeout(Duration::from_secs(2), listener.recv_from(&mut buf))
        .await
        .expect("no packet within 2s")
        .unwrap();
    assert_eq!(n, 102);
}
