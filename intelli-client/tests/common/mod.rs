//! Test support: an in-process backend and client wiring
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use intelli_client::notice::NoticeLog;
use intelli_client::session::{KEY_REFRESH_TOKEN, KEY_TOKEN, KEY_USER, MemoryStorage, SessionStorage};
use intelli_client::{AuthSignals, ClientConfig, HttpPipeline};
use serde_json::{Value, json};

/// Serve `router` on an ephemeral port and return the API base URL
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// Envelope with success code
pub fn ok(data: Value) -> Value {
    json!({ "code": 200, "message": "成功", "data": data, "timestamp": 1718000000000i64 })
}

/// Envelope with a domain error code
pub fn failed(code: i32, message: &str) -> Value {
    json!({ "code": code, "message": message, "data": null, "timestamp": 1718000000000i64 })
}

pub fn user_json() -> Value {
    json!({
        "id": "u-1",
        "username": "alice",
        "nickname": "Alice",
        "role": "tenant_admin",
        "tenantId": "t-1",
        "tenantName": "Acme",
        "permissions": ["api:list", "user:list"]
    })
}

pub fn login_json() -> Value {
    json!({
        "accessToken": "access-1",
        "refreshToken": "refresh-1",
        "tokenType": "Bearer",
        "expiresIn": 7200,
        "user": user_json()
    })
}

/// Storage holding a signed-in session
pub fn signed_in_storage() -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage.set(KEY_TOKEN, "access-0").unwrap();
    storage.set(KEY_REFRESH_TOKEN, "refresh-0").unwrap();
    storage.set(KEY_USER, &user_json().to_string()).unwrap();
    storage
}

pub struct Harness {
    pub pipeline: HttpPipeline,
    pub storage: MemoryStorage,
    pub notices: NoticeLog,
    pub signals: AuthSignals,
}

pub fn harness(base_url: &str, storage: MemoryStorage) -> Harness {
    harness_with(ClientConfig::new(base_url), storage)
}

pub fn harness_with(config: ClientConfig, storage: MemoryStorage) -> Harness {
    let notices = NoticeLog::new();
    let signals = AuthSignals::new();
    let pipeline = HttpPipeline::new(
        &config,
        Arc::new(storage.clone()),
        Arc::new(notices.clone()),
        signals.clone(),
    )
    .unwrap();
    Harness {
        pipeline,
        storage,
        notices,
        signals,
    }
}
