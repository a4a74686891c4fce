//! Data models
//!
//! DTOs of the IntelliHub management endpoints, shared between the console
//! and the typed API wrappers. Wire names are camelCase.

pub mod aigc;
pub mod alert;
pub mod announcement;
pub mod api_manage;
pub mod app;
pub mod event;
pub mod ratelimit;
pub mod role;
pub mod search;
pub mod stats;
pub mod tenant;
pub mod user;

// Re-exports
pub use aigc::*;
pub use alert::*;
pub use announcement::*;
pub use api_manage::*;
pub use app::*;
pub use event::*;
pub use ratelimit::*;
pub use role::*;
pub use search::*;
pub use stats::*;
pub use tenant::*;
pub use user::*;
