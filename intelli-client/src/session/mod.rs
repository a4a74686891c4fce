//! Session store
//!
//! Holds the signed-in identity and its tokens, mirrors them into
//! [`SessionStorage`], and answers authorization questions. The store is an
//! owned value: the app shell constructs it, and only its own methods mutate it.

mod storage;

pub use storage::{
    FileStorage, KEY_REFRESH_TOKEN, KEY_TOKEN, KEY_USER, MemoryStorage, SESSION_KEYS,
    SessionStorage, StorageError,
};

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::models::UserRole;

use crate::api::AuthApi;
use crate::error::{ClientError, ClientResult};

/// Persisted user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl From<UserInfo> for User {
    fn from(info: UserInfo) -> Self {
        Self {
            id: info.id,
            username: info.username,
            email: info.email,
            nickname: info.nickname,
            phone: info.phone,
            role: info.role,
            tenant_id: info.tenant_id,
            tenant_name: info.tenant_name,
            avatar: info.avatar,
            permissions: info.permissions.into_iter().collect(),
            last_login_at: info.last_login_at,
        }
    }
}

/// Profile fields that may be edited in place
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub tenant_name: Option<String>,
}

/// Snapshot of an authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.user.tenant_id.as_deref()
    }
}

/// Result of [`SessionStore::restore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Token and user were both persisted
    Restored,
    /// Only the token was persisted; the user was fetched again
    Repaired,
    /// Nothing was persisted
    Anonymous,
    /// Persisted state was inconsistent or could not be repaired and was cleared
    LoggedOut,
}

/// Remote source of the current user's profile
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn current_user(&self) -> ClientResult<UserInfo>;
}

/// Client-side session state
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    token: Option<String>,
    refresh_token: Option<String>,
    user: Option<User>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("user", &self.user.as_ref().map(|u| &u.username))
            .finish()
    }
}

impl SessionStore {
    /// Create a store over `storage` and read whatever it currently holds.
    ///
    /// A user record that fails to parse is treated as absent.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let mut store = Self {
            storage,
            token: None,
            refresh_token: None,
            user: None,
        };
        store.reload();
        store
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    /// Re-read the persisted session into memory
    fn reload(&mut self) {
        self.token = read_non_empty(self.storage.as_ref(), KEY_TOKEN);
        self.refresh_token = read_non_empty(self.storage.as_ref(), KEY_REFRESH_TOKEN);
        self.user = read_non_empty(self.storage.as_ref(), KEY_USER).and_then(|raw| {
            serde_json::from_str(&raw)
                .map_err(|e| tracing::warn!(error = %e, "Ignoring unreadable stored user"))
                .ok()
        });
    }

    /// Restore the session persisted by a previous run.
    ///
    /// A token without a user is repaired by fetching the profile; if that
    /// fails, or if a user is stored without a token, everything is cleared.
    pub async fn restore(&mut self, profile: &dyn ProfileSource) -> ClientResult<RestoreOutcome> {
        self.reload();

        let mut repaired = false;
        if self.token.is_some() && self.user.is_none() {
            match profile.current_user().await {
                Ok(info) => {
                    self.replace_user(info.into())?;
                    repaired = true;
                    tracing::info!("Session repaired from current-user profile");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to restore auth state");
                    self.clear()?;
                    return Ok(RestoreOutcome::LoggedOut);
                }
            }
        }

        if self.token.is_some() != self.user.is_some() {
            tracing::warn!("Inconsistent persisted session, clearing");
            self.clear()?;
            return Ok(RestoreOutcome::LoggedOut);
        }

        Ok(match (self.is_authenticated(), repaired) {
            (true, true) => RestoreOutcome::Repaired,
            (true, false) => {
                tracing::info!(username = ?self.user.as_ref().map(|u| &u.username), "Loaded persisted session");
                RestoreOutcome::Restored
            }
            (false, _) => RestoreOutcome::Anonymous,
        })
    }

    /// Replace the whole session, in memory and in storage
    pub fn set_auth(
        &mut self,
        token: impl Into<String>,
        refresh_token: impl Into<String>,
        user: User,
    ) -> ClientResult<()> {
        let token = token.into();
        let refresh_token = refresh_token.into();
        let user_json = serde_json::to_string(&user)?;

        let persisted = self
            .storage
            .set(KEY_TOKEN, &token)
            .and_then(|_| self.storage.set(KEY_REFRESH_TOKEN, &refresh_token))
            .and_then(|_| self.storage.set(KEY_USER, &user_json));
        if let Err(e) = persisted {
            // Never leave half a session behind
            let _ = self.storage.clear_session();
            return Err(e.into());
        }

        tracing::debug!(username = %user.username, "Session set");
        self.token = Some(token);
        self.refresh_token = Some(refresh_token).filter(|t| !t.is_empty());
        self.user = Some(user);
        Ok(())
    }

    /// Drop the session. Safe to call when already cleared.
    pub fn clear(&mut self) -> ClientResult<()> {
        self.token = None;
        self.refresh_token = None;
        self.user = None;
        self.storage.clear_session()?;
        tracing::debug!("Session cleared");
        Ok(())
    }

    /// Merge profile edits into the current user
    pub fn update_user(&mut self, patch: UserPatch) -> ClientResult<()> {
        let Some(mut user) = self.user.clone() else {
            return Ok(());
        };
        if let Some(email) = patch.email {
            user.email = Some(email);
        }
        if let Some(nickname) = patch.nickname {
            user.nickname = Some(nickname);
        }
        if let Some(phone) = patch.phone {
            user.phone = Some(phone);
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(tenant_name) = patch.tenant_name {
            user.tenant_name = Some(tenant_name);
        }
        self.replace_user(user)
    }

    fn replace_user(&mut self, user: User) -> ClientResult<()> {
        self.storage.set(KEY_USER, &serde_json::to_string(&user)?)?;
        self.user = Some(user);
        Ok(())
    }

    // ========== Remote operations ==========

    /// Log in and replace the session
    pub async fn login(&mut self, api: &AuthApi, request: &LoginRequest) -> ClientResult<()> {
        let response = api.login(request).await?;
        self.apply_login(response)
    }

    /// Register a new account and replace the session
    pub async fn register(&mut self, api: &AuthApi, request: &RegisterRequest) -> ClientResult<()> {
        let response = api.register(request).await?;
        self.apply_login(response)
    }

    /// Exchange the refresh token for a new session
    pub async fn refresh(&mut self, api: &AuthApi) -> ClientResult<()> {
        let refresh_token = self
            .refresh_token
            .clone()
            .ok_or(ClientError::NotAuthenticated)?;
        let response = api.refresh_token(&refresh_token).await?;
        self.apply_login(response)
    }

    fn apply_login(&mut self, response: LoginResponse) -> ClientResult<()> {
        let LoginResponse {
            access_token,
            refresh_token,
            user,
            ..
        } = response;
        self.set_auth(access_token, refresh_token, user.into())
    }

    /// Log out remotely; the local session is cleared even if the call fails
    pub async fn logout(&mut self, api: &AuthApi) -> ClientResult<()> {
        if let Err(e) = api.logout().await {
            tracing::error!(error = %e, "Logout API error");
        }
        self.clear()
    }

    /// Re-fetch the current user; any failure clears the session
    pub async fn fetch_current_user(&mut self, profile: &dyn ProfileSource) -> ClientResult<()> {
        if self.token.is_none() {
            return Ok(());
        }
        match profile.current_user().await {
            Ok(info) => self.replace_user(info.into()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch current user");
                self.clear()?;
                Err(e)
            }
        }
    }

    // ========== Accessors and predicates ==========

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Option<Session> {
        match (&self.token, &self.user) {
            (Some(token), Some(user)) => Some(Session {
                access_token: token.clone(),
                refresh_token: self.refresh_token.clone(),
                user: user.clone(),
            }),
            _ => None,
        }
    }

    /// True iff both a token and a user are present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Current role; `user` when signed out
    pub fn role(&self) -> UserRole {
        self.user.as_ref().map(|u| u.role).unwrap_or_default()
    }

    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.user
            .iter()
            .flat_map(|u| u.permissions.iter().map(String::as_str))
    }

    pub fn is_platform_admin(&self) -> bool {
        self.role() == UserRole::PlatformAdmin
    }

    pub fn is_tenant_admin(&self) -> bool {
        self.role() == UserRole::TenantAdmin
    }

    pub fn is_admin(&self) -> bool {
        self.is_platform_admin() || self.is_tenant_admin()
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role() == role
    }

    /// Check a single permission code
    pub fn has_permission(&self, code: &str) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        if self.is_platform_admin() {
            return true;
        }
        self.user
            .as_ref()
            .is_some_and(|u| u.permissions.contains(code))
    }

    /// Check that at least one of `codes` is held
    pub fn has_any_permission<I, S>(&self, codes: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.is_authenticated() {
            return false;
        }
        if self.is_platform_admin() {
            return true;
        }
        let Some(user) = &self.user else {
            return false;
        };
        codes
            .into_iter()
            .any(|code| user.permissions.contains(code.as_ref()))
    }
}

fn read_non_empty(storage: &dyn SessionStorage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read session storage");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn user(role: UserRole, permissions: &[&str]) -> User {
        User {
            id: "u-1".into(),
            username: "alice".into(),
            email: None,
            nickname: Some("Alice".into()),
            phone: None,
            role,
            tenant_id: Some("t-1".into()),
            tenant_name: None,
            avatar: None,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            last_login_at: None,
        }
    }

    fn info() -> UserInfo {
        serde_json::from_value(serde_json::json!({
            "id": "u-9",
            "username": "bob",
            "role": "tenant_admin",
            "tenantId": "t-9",
            "permissions": ["api:list"]
        }))
        .unwrap()
    }

    struct FakeProfile {
        result: Option<UserInfo>,
        calls: AtomicUsize,
    }

    impl FakeProfile {
        fn ok() -> Self {
            Self {
                result: Some(info()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ProfileSource for FakeProfile {
        async fn current_user(&self) -> ClientResult<UserInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or(ClientError::Domain {
                code: 4105,
                message: "Token无效或已过期".into(),
            })
        }
    }

    fn store() -> (SessionStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (SessionStore::new(Arc::new(storage.clone())), storage)
    }

    #[test]
    fn test_authenticated_requires_token_and_user() {
        let (mut store, storage) = store();
        assert!(!store.is_authenticated());

        storage.set(KEY_TOKEN, "t").unwrap();
        let store_token_only = SessionStore::new(Arc::new(storage.clone()));
        assert!(!store_token_only.is_authenticated());

        store.set_auth("t", "r", user(UserRole::User, &[])).unwrap();
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_set_auth_overwrites_previous_session() {
        let (mut store, storage) = store();
        store
            .set_auth("t1", "r1", user(UserRole::User, &["api:list"]))
            .unwrap();
        let mut other = user(UserRole::TenantAdmin, &[]);
        other.username = "carol".into();
        store.set_auth("t2", "r2", other.clone()).unwrap();

        assert_eq!(store.token(), Some("t2"));
        assert_eq!(store.user(), Some(&other));
        assert!(!store.has_permission("api:list"));
        assert_eq!(storage.get(KEY_TOKEN).unwrap().as_deref(), Some("t2"));
        assert_eq!(storage.get(KEY_REFRESH_TOKEN).unwrap().as_deref(), Some("r2"));
    }

    #[test]
    fn test_clear_twice_is_same_as_once() {
        let (mut store, storage) = store();
        store.set_auth("t", "r", user(UserRole::User, &[])).unwrap();
        store.clear().unwrap();
        let once = (store.session(), storage.len());
        store.clear().unwrap();
        assert_eq!((store.session(), storage.len()), once);
        assert_eq!(once, (None, 0));
    }

    #[test]
    fn test_corrupt_session_file_does_not_lock_out_login() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        std::fs::write(storage.path(), "{truncated").unwrap();

        let mut store = SessionStore::new(Arc::new(storage));
        assert!(!store.is_authenticated());
        store.clear().unwrap();

        store.set_auth("t", "r", user(UserRole::User, &[])).unwrap();
        assert!(store.is_authenticated());

        let reopened = SessionStore::new(Arc::new(FileStorage::new(temp_dir.path())));
        assert_eq!(reopened.token(), Some("t"));
    }

    #[test]
    fn test_permission_checks() {
        let (mut store, _) = store();
        assert!(!store.has_permission("api:list"));
        assert!(!store.has_any_permission(["api:list"]));

        store
            .set_auth("t", "r", user(UserRole::User, &["api:list", "app:list"]))
            .unwrap();
        assert!(store.has_permission("api:list"));
        assert!(!store.has_permission("tenant:list"));
        assert!(store.has_any_permission(["tenant:list", "app:list"]));
        assert!(!store.has_any_permission(["tenant:list", "user:list"]));
        assert!(!store.has_any_permission(Vec::<String>::new()));
    }

    #[test]
    fn test_platform_admin_passes_everything() {
        let (mut store, _) = store();
        store
            .set_auth("t", "r", user(UserRole::PlatformAdmin, &[]))
            .unwrap();
        assert!(store.has_permission("anything:at-all"));
        assert!(store.has_any_permission(["x", "y"]));
        assert!(store.is_admin());
        assert!(!store.is_tenant_admin());
    }

    #[tokio::test]
    async fn test_restore_roundtrip() {
        let (mut store, storage) = store();
        store
            .set_auth("t", "r", user(UserRole::TenantAdmin, &["user:list"]))
            .unwrap();
        let before = store.session();

        let mut reloaded = SessionStore::new(Arc::new(storage));
        let profile = FakeProfile::ok();
        let outcome = reloaded.restore(&profile).await.unwrap();

        assert_eq!(outcome, RestoreOutcome::Restored);
        assert_eq!(reloaded.session(), before);
        assert_eq!(profile.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_restore_repairs_missing_user() {
        let (mut store, storage) = store();
        storage.set(KEY_TOKEN, "t").unwrap();

        let outcome = store.restore(&FakeProfile::ok()).await.unwrap();
        assert_eq!(outcome, RestoreOutcome::Repaired);
        assert_eq!(store.user().unwrap().username, "bob");
        assert!(storage.get(KEY_USER).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_restore_clears_when_repair_fails() {
        let (mut store, storage) = store();
        storage.set(KEY_TOKEN, "t").unwrap();
        storage.set(KEY_REFRESH_TOKEN, "r").unwrap();

        let outcome = store.restore(&FakeProfile::failing()).await.unwrap();
        assert_eq!(outcome, RestoreOutcome::LoggedOut);
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_restore_clears_user_without_token() {
        let (mut store, storage) = store();
        storage
            .set(KEY_USER, &serde_json::to_string(&user(UserRole::User, &[])).unwrap())
            .unwrap();

        let profile = FakeProfile::ok();
        let outcome = store.restore(&profile).await.unwrap();
        assert_eq!(outcome, RestoreOutcome::LoggedOut);
        assert!(storage.is_empty());
        assert_eq!(profile.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_restore_treats_corrupt_user_as_missing() {
        let (mut store, storage) = store();
        storage.set(KEY_TOKEN, "t").unwrap();
        storage.set(KEY_USER, "{not json").unwrap();

        let outcome = store.restore(&FakeProfile::ok()).await.unwrap();
        assert_eq!(outcome, RestoreOutcome::Repaired);
        assert_eq!(store.user().unwrap().id, "u-9");
    }

    #[tokio::test]
    async fn test_restore_anonymous() {
        let (mut store, _) = store();
        let outcome = store.restore(&FakeProfile::ok()).await.unwrap();
        assert_eq!(outcome, RestoreOutcome::Anonymous);
    }

    #[tokio::test]
    async fn test_fetch_current_user_failure_clears() {
        let (mut store, storage) = store();
        store.set_auth("t", "r", user(UserRole::User, &[])).unwrap();

        let result = store.fetch_current_user(&FakeProfile::failing()).await;
        assert!(matches!(result, Err(ClientError::Domain { code: 4105, .. })));
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_update_user_merges() {
        let (mut store, storage) = store();
        store.update_user(UserPatch::default()).unwrap();
        assert!(store.user().is_none());

        store.set_auth("t", "r", user(UserRole::User, &[])).unwrap();
        store
            .update_user(UserPatch {
                email: Some("a@example.com".into()),
                ..Default::default()
            })
            .unwrap();

        let updated = store.user().unwrap();
        assert_eq!(updated.email.as_deref(), Some("a@example.com"));
        assert_eq!(updated.nickname.as_deref(), Some("Alice"));
        let persisted: User =
            serde_json::from_str(&storage.get(KEY_USER).unwrap().unwrap()).unwrap();
        assert_eq!(&persisted, updated);
    }

    #[test]
    fn test_user_record_wire_format() {
        let json = serde_json::to_value(user(UserRole::TenantAdmin, &["b", "a"])).unwrap();
        assert_eq!(json["tenantId"], "t-1");
        assert_eq!(json["role"], "tenant_admin");
        assert_eq!(json["permissions"], serde_json::json!(["a", "b"]));
    }
}
