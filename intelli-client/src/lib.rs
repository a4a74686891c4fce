//! IntelliHub console client
//!
//! Client-side runtime of the IntelliHub admin console: session state, the
//! request pipeline with its envelope and auth-teardown rules, route guards,
//! and the AIGC event-stream reader.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod notice;
pub mod router;
pub mod session;
pub mod signal;
pub mod stream;

pub use api::ConsoleApi;
pub use app::ConsoleApp;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpPipeline;
pub use notice::{Notice, NoticeLog, Notifier, TracingNotifier};
pub use router::{Location, Navigation, NavigationDecision, Navigator, RouteGuard, RouteTable};
pub use session::{
    FileStorage, MemoryStorage, ProfileSource, RestoreOutcome, Session, SessionStorage,
    SessionStore, User,
};
pub use signal::{AuthEvent, AuthSignals};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, UserInfo};
pub use shared::models::UserRole;
