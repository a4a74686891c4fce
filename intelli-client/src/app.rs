//! Console app shell
//!
//! Wires storage, pipeline, session store and navigator together, and reacts
//! to the pipeline's unauthorized signal by dropping the in-memory session and
//! sending the user home to log in.

use std::sync::Arc;

use shared::client::LoginRequest;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::api::ConsoleApi;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::HttpPipeline;
use crate::notice::Notifier;
use crate::router::{
    CONSOLE_HOME, Navigation, Navigator, REDIRECT_QUERY, RouteGuard, RouteTable, console_routes,
    login_required,
};
use crate::session::{FileStorage, RestoreOutcome, SessionStorage, SessionStore};
use crate::signal::{AuthEvent, AuthSignals};

pub struct ConsoleApp {
    store: SessionStore,
    navigator: Navigator,
    api: ConsoleApi,
    signals: AuthSignals,
    events: broadcast::Receiver<AuthEvent>,
}

impl std::fmt::Debug for ConsoleApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleApp")
            .field("store", &self.store)
            .field("location", &self.navigator.current().map(|n| n.location.full_path()))
            .finish_non_exhaustive()
    }
}

impl ConsoleApp {
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> ClientResult<Self> {
        let signals = AuthSignals::new();
        let events = signals.subscribe();
        let pipeline = HttpPipeline::new(config, storage.clone(), notifier, signals.clone())?;

        Ok(Self {
            store: SessionStore::new(storage),
            navigator: Navigator::new(
                RouteTable::new(console_routes()),
                RouteGuard::new(config.app_name.clone()),
            ),
            api: ConsoleApi::new(pipeline),
            signals,
            events,
        })
    }

    /// App persisting its session under `config.storage_dir`
    pub fn with_file_storage(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> ClientResult<Self> {
        let storage = FileStorage::new(&config.storage_dir);
        tracing::debug!(path = %storage.path().display(), "Using file session storage");
        Self::new(config, Arc::new(storage), notifier)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn api(&self) -> &ConsoleApi {
        &self.api
    }

    pub fn signals(&self) -> &AuthSignals {
        &self.signals
    }

    /// Restore the previous session
    pub async fn start(&mut self) -> ClientResult<RestoreOutcome> {
        let outcome = self.store.restore(&self.api.auth).await;
        self.process_signals();
        let outcome = outcome?;
        tracing::info!(?outcome, "Console started");
        Ok(outcome)
    }

    /// Handle every pending auth signal, returning how many were seen
    pub fn process_signals(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.on_auth_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Auth signals lagged");
                    self.on_auth_event(AuthEvent::Unauthorized);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        handled
    }

    fn on_auth_event(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::Unauthorized => {
                tracing::info!("Session rejected by backend, logging out");
                if let Err(e) = self.store.clear() {
                    tracing::error!(error = %e, "Failed to clear session");
                }
                if let Err(e) = self.navigator.navigate_to(login_required(None), &self.store) {
                    tracing::error!(error = %e, "Failed to navigate to login");
                }
            }
        }
    }

    /// Navigate, applying any pending signals first
    pub fn navigate(&mut self, path: &str) -> ClientResult<Navigation> {
        self.process_signals();
        Ok(self.navigator.navigate(path, &self.store)?)
    }

    /// Log in, then continue to the page that asked for it (or the console)
    pub async fn login(&mut self, request: &LoginRequest) -> ClientResult<Navigation> {
        let result = self.store.login(&self.api.auth, request).await;
        self.process_signals();
        result?;

        let target = self
            .navigator
            .current()
            .and_then(|nav| nav.location.query_value(REDIRECT_QUERY))
            .unwrap_or(CONSOLE_HOME)
            .to_string();
        self.navigate(&target)
    }

    /// Log out and return home
    pub async fn logout(&mut self) -> ClientResult<Navigation> {
        let result = self.store.logout(&self.api.auth).await;
        self.process_signals();
        result?;
        self.navigate("/")
    }

    /// Re-fetch the signed-in user's profile
    pub async fn refresh_profile(&mut self) -> ClientResult<()> {
        let result = self.store.fetch_current_user(&self.api.auth).await;
        self.process_signals();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLog;
    use crate::session::{KEY_TOKEN, MemoryStorage, User};
    use shared::models::UserRole;

    fn app(storage: &MemoryStorage) -> ConsoleApp {
        ConsoleApp::new(
            &ClientConfig::new("http://127.0.0.1:9/api"),
            Arc::new(storage.clone()),
            Arc::new(NoticeLog::new()),
        )
        .unwrap()
    }

    fn user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "username": "alice",
            "role": "user",
            "permissions": ["api:list"]
        }))
        .unwrap()
    }

    #[test]
    fn test_unauthorized_signal_logs_out() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        app.store.set_auth("t", "r", user()).unwrap();
        app.navigate("/console/api/list").unwrap();

        // The pipeline clears storage itself before publishing
        storage.clear_session().unwrap();
        app.signals().publish(AuthEvent::Unauthorized);

        assert_eq!(app.process_signals(), 1);
        assert!(!app.store().is_authenticated());
        let current = app.navigator().current().unwrap();
        assert_eq!(current.location.full_path(), "/?login=required");
        assert_eq!(storage.get(KEY_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_navigate_uses_session() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let anonymous = app.navigate("/console/api/list").unwrap();
        assert_eq!(anonymous.location.path, "/");

        app.store.set_auth("t", "r", user()).unwrap();
        let signed_in = app.navigate("/console/api/list").unwrap();
        assert_eq!(signed_in.location.path, "/console/api/list");
        assert_eq!(app.store().role(), UserRole::User);
    }
}
