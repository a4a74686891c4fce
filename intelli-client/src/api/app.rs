//! Application center (`/app-center/v1/apps`)

use serde::Serialize;
use shared::PageResult;
use shared::models::{AppCredentials, AppInfo, AppQuery, AppRequest, AppSubscription, SubscribeApiRequest};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const APPS: &str = "/app-center/v1/apps";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppKeyQuery<'a> {
    app_key: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiIdQuery<'a> {
    api_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct AppApi {
    http: HttpPipeline,
}

impl AppApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    fn app(id: &str) -> String {
        format!("{APPS}/{}", segment(id))
    }

    pub async fn list(&self, query: &AppQuery) -> ClientResult<PageResult<AppInfo>> {
        self.http.get_with(&format!("{APPS}/list"), query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<AppInfo> {
        self.http.get(&format!("{}/detail", Self::app(id))).await
    }

    pub async fn get_by_app_key(&self, app_key: &str) -> ClientResult<AppInfo> {
        self.http
            .get_with(&format!("{APPS}/by-appkey"), &AppKeyQuery { app_key })
            .await
    }

    /// Register an application; the returned secret is not retrievable later
    pub async fn create(&self, request: &AppRequest) -> ClientResult<AppCredentials> {
        self.http.post(&format!("{APPS}/create"), request).await
    }

    pub async fn update(&self, id: &str, request: &AppRequest) -> ClientResult<AppInfo> {
        self.http
            .post(&format!("{}/update", Self::app(id)), request)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http.post_empty(&format!("{}/delete", Self::app(id))).await
    }

    pub async fn enable(&self, id: &str) -> ClientResult<()> {
        self.http.post_empty(&format!("{}/enable", Self::app(id))).await
    }

    pub async fn disable(&self, id: &str) -> ClientResult<()> {
        self.http.post_empty(&format!("{}/disable", Self::app(id))).await
    }

    pub async fn reset_secret(&self, id: &str) -> ClientResult<AppCredentials> {
        self.http
            .post_for(&format!("{}/reset-secret", Self::app(id)))
            .await
    }

    pub async fn subscribe(&self, id: &str, request: &SubscribeApiRequest) -> ClientResult<()> {
        self.http
            .post_void(&format!("{}/subscribe", Self::app(id)), request)
            .await
    }

    pub async fn unsubscribe(&self, id: &str, api_id: &str) -> ClientResult<()> {
        self.http
            .post_empty_with(&format!("{}/unsubscribe", Self::app(id)), &ApiIdQuery { api_id })
            .await
    }

    pub async fn subscriptions(&self, id: &str) -> ClientResult<Vec<AppSubscription>> {
        self.http
            .get(&format!("{}/subscriptions", Self::app(id)))
            .await
    }
}
