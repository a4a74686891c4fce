mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use common::{failed, harness, login_json, ok, signed_in_storage, spawn_backend, user_json};
use intelli_client::api::AuthApi;
use intelli_client::notice::NoticeLog;
use intelli_client::session::{KEY_REFRESH_TOKEN, KEY_TOKEN, KEY_USER, SessionStorage};
use intelli_client::{
    ClientConfig, ConsoleApp, FileStorage, LoginRequest, MemoryStorage, RestoreOutcome,
    SessionStore, UserRole,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_restore_fetches_missing_user() {
    let base = spawn_backend(Router::new().route(
        "/api/iam/v1/auth/me",
        get(|| async { Json(ok(user_json())) }),
    ))
    .await;
    let storage = MemoryStorage::new();
    storage.set(KEY_TOKEN, "access-0").unwrap();
    let h = harness(&base, storage.clone());
    let api = AuthApi::new(h.pipeline.clone());

    let mut store = SessionStore::new(Arc::new(storage.clone()));
    assert!(!store.is_authenticated());

    let outcome = store.restore(&api).await.unwrap();
    assert_eq!(outcome, RestoreOutcome::Repaired);
    assert!(store.is_authenticated());
    assert_eq!(store.role(), UserRole::TenantAdmin);
    assert!(store.has_permission("user:list"));
    assert!(storage.get(KEY_USER).unwrap().is_some());
}

#[tokio::test]
async fn test_restore_with_rejected_token_logs_out() {
    let base = spawn_backend(Router::new().route(
        "/api/iam/v1/auth/me",
        get(|| async { Json(failed(4106, "Token已过期")) }),
    ))
    .await;
    let storage = MemoryStorage::new();
    storage.set(KEY_TOKEN, "stale").unwrap();
    storage.set(KEY_REFRESH_TOKEN, "stale-refresh").unwrap();
    let h = harness(&base, storage.clone());
    let mut events = h.signals.subscribe();

    let mut store = SessionStore::new(Arc::new(storage.clone()));
    let outcome = store.restore(&AuthApi::new(h.pipeline.clone())).await.unwrap();

    assert_eq!(outcome, RestoreOutcome::LoggedOut);
    assert!(!store.is_authenticated());
    assert!(storage.is_empty());
    assert!(events.try_recv().is_ok());
}

#[tokio::test]
async fn test_login_persists_session_to_disk() {
    let base = spawn_backend(Router::new().route(
        "/api/iam/v1/auth/login",
        post(|Json(body): Json<serde_json::Value>| async move {
            if body["username"] == "alice" && body["password"] == "secret" {
                Json(ok(login_json()))
            } else {
                Json(failed(4001, "用户名或密码错误"))
            }
        }),
    ))
    .await;
    let temp_dir = TempDir::new().unwrap();
    let config = ClientConfig::new(&base).with_storage_dir(temp_dir.path());

    let mut app = ConsoleApp::with_file_storage(&config, Arc::new(NoticeLog::new())).unwrap();
    assert_eq!(app.start().await.unwrap(), RestoreOutcome::Anonymous);

    let wrong = app.login(&LoginRequest::new("alice", "nope")).await;
    assert!(wrong.is_err());
    assert!(!app.store().is_authenticated());

    let navigation = app.login(&LoginRequest::new("alice", "secret")).await.unwrap();
    assert_eq!(navigation.location.path, "/console");
    assert_eq!(app.store().token(), Some("access-1"));

    // A second process sees the same session without asking the backend
    let storage = FileStorage::new(temp_dir.path());
    assert_eq!(storage.get(KEY_TOKEN).unwrap().as_deref(), Some("access-1"));
    let mut reopened = ConsoleApp::with_file_storage(&config, Arc::new(NoticeLog::new())).unwrap();
    assert_eq!(reopened.start().await.unwrap(), RestoreOutcome::Restored);
    assert_eq!(
        reopened.store().session(),
        app.store().session(),
    );
}

#[tokio::test]
async fn test_login_returns_to_requested_page() {
    let base = spawn_backend(Router::new().route(
        "/api/iam/v1/auth/login",
        post(|| async { Json(ok(login_json())) }),
    ))
    .await;
    let mut app = ConsoleApp::new(
        &ClientConfig::new(&base),
        Arc::new(MemoryStorage::new()),
        Arc::new(NoticeLog::new()),
    )
    .unwrap();

    let bounced = app.navigate("/console/users/list").unwrap();
    assert_eq!(bounced.location.query_value("login"), Some("required"));

    let navigation = app.login(&LoginRequest::new("alice", "secret")).await.unwrap();
    assert_eq!(navigation.location.path, "/console/users/list");
    assert_eq!(navigation.title, "用户列表 - IntelliHub");
}

#[tokio::test]
async fn test_logout_clears_even_when_backend_fails() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let base = spawn_backend(Router::new().route(
        "/api/iam/v1/auth/logout",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }),
    ))
    .await;
    let storage = signed_in_storage();
    let h = harness(&base, storage.clone());
    let api = AuthApi::new(h.pipeline.clone());

    let mut store = SessionStore::new(Arc::new(storage.clone()));
    assert!(store.is_authenticated());
    store.logout(&api).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!store.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_fetch_current_user_replaces_record() {
    let base = spawn_backend(Router::new().route(
        "/api/iam/v1/auth/me",
        get(|| async {
            let mut user = user_json();
            user["nickname"] = "Alice Liddell".into();
            Json(ok(user))
        }),
    ))
    .await;
    let storage = signed_in_storage();
    let h = harness(&base, storage.clone());

    let mut store = SessionStore::new(Arc::new(storage.clone()));
    store
        .fetch_current_user(&AuthApi::new(h.pipeline.clone()))
        .await
        .unwrap();

    assert_eq!(
        store.user().and_then(|u| u.nickname.as_deref()),
        Some("Alice Liddell")
    );
    assert!(storage.get(KEY_USER).unwrap().unwrap().contains("Alice Liddell"));
}

#[tokio::test]
async fn test_backend_rejection_logs_app_out() {
    let base = spawn_backend(Router::new().route(
        "/api/iam/v1/users/{id}",
        get(|| async { Json(failed(4105, "Token无效或已过期")) }),
    ))
    .await;
    let storage = signed_in_storage();
    let mut app = ConsoleApp::new(
        &ClientConfig::new(&base),
        Arc::new(storage.clone()),
        Arc::new(NoticeLog::new()),
    )
    .unwrap();
    assert_eq!(app.start().await.unwrap(), RestoreOutcome::Restored);
    app.navigate("/console/api/list").unwrap();

    assert!(app.api().users.get("u-2").await.is_err());
    // The store still holds the session until the signal is handled
    assert!(app.store().is_authenticated());
    assert_eq!(app.process_signals(), 1);

    assert!(!app.store().is_authenticated());
    assert!(storage.is_empty());
    let current = app.navigator().current().unwrap();
    assert_eq!(current.location.full_path(), "/?login=required");

    let bounced = app.navigate("/console/api/list").unwrap();
    assert_eq!(bounced.location.query_value("redirect"), Some("/console/api/list"));
}
