//! App-wide auth signals
//!
//! The transport layer publishes here; the app shell subscribes. Neither side
//! holds a reference to the other, so the pipeline never depends on the
//! session store or the router.

use tokio::sync::broadcast;

/// Signal capacity; subscribers that lag further lose the oldest signals
const SIGNAL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// Backend invalidated the session; persisted credentials are already gone
    Unauthorized,
}

/// Publish–subscribe channel for [`AuthEvent`]s
#[derive(Debug, Clone)]
pub struct AuthSignals {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthSignals {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { sender }
    }

    /// Register an observer; it sees every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Publish an event, returning how many observers received it
    pub fn publish(&self, event: AuthEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!(?event, "auth signal published with no observers");
                0
            }
        }
    }

    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for AuthSignals {
    fn default() -> Self {
        Self::new()
    }
}
