//! Typed backend APIs
//!
//! Thin wrappers over [`HttpPipeline`]; each one owns a clone of the pipeline
//! and maps endpoints to the DTOs in `shared`.

mod aigc;
mod alert;
mod announcement;
mod api_manage;
mod app;
mod auth;
mod event;
mod ratelimit;
mod role;
mod search;
mod stats;
mod tenant;
mod user;

pub use aigc::AigcApi;
pub use alert::AlertApi;
pub use announcement::AnnouncementApi;
pub use api_manage::ApiManageApi;
pub use app::AppApi;
pub use auth::AuthApi;
pub use event::EventApi;
pub use ratelimit::RatelimitApi;
pub use role::RoleApi;
pub use search::SearchApi;
pub use stats::{StatsApi, api_stats_key};
pub use tenant::TenantApi;
pub use user::UserApi;

use std::borrow::Cow;

use crate::http::HttpPipeline;

/// Every API, sharing one pipeline
#[derive(Debug, Clone)]
pub struct ConsoleApi {
    pub auth: AuthApi,
    pub users: UserApi,
    pub roles: RoleApi,
    pub tenants: TenantApi,
    pub ratelimit: RatelimitApi,
    pub announcements: AnnouncementApi,
    pub aigc: AigcApi,
    pub apis: ApiManageApi,
    pub apps: AppApi,
    pub alerts: AlertApi,
    pub events: EventApi,
    pub search: SearchApi,
    pub stats: StatsApi,
}

impl ConsoleApi {
    pub fn new(pipeline: HttpPipeline) -> Self {
        Self {
            auth: AuthApi::new(pipeline.clone()),
            users: UserApi::new(pipeline.clone()),
            roles: RoleApi::new(pipeline.clone()),
            tenants: TenantApi::new(pipeline.clone()),
            ratelimit: RatelimitApi::new(pipeline.clone()),
            announcements: AnnouncementApi::new(pipeline.clone()),
            aigc: AigcApi::new(pipeline.clone()),
            apis: ApiManageApi::new(pipeline.clone()),
            apps: AppApi::new(pipeline.clone()),
            alerts: AlertApi::new(pipeline.clone()),
            events: EventApi::new(pipeline.clone()),
            search: SearchApi::new(pipeline.clone()),
            stats: StatsApi::new(pipeline),
        }
    }
}

/// Escape an id for use as a path segment
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}
