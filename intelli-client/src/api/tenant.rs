//! Tenant management (`/iam/v1/tenants`)

use shared::PageData;
use shared::models::{
    CreateTenantRequest, TenantQuery, TenantQuotaInfo, TenantQuotaRequest, TenantResponse,
    UpdateTenantRequest,
};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const TENANTS: &str = "/iam/v1/tenants";

#[derive(Debug, Clone)]
pub struct TenantApi {
    http: HttpPipeline,
}

impl TenantApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &TenantQuery) -> ClientResult<PageData<TenantResponse>> {
        self.http.get_with(TENANTS, query).await
    }

    pub async fn create(&self, request: &CreateTenantRequest) -> ClientResult<TenantResponse> {
        self.http.post(TENANTS, request).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<TenantResponse> {
        self.http.get(&format!("{TENANTS}/{}", segment(id))).await
    }

    pub async fn update(&self, id: &str, request: &UpdateTenantRequest) -> ClientResult<TenantResponse> {
        self.http
            .put(&format!("{TENANTS}/{}", segment(id)), request)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&format!("{TENANTS}/{}", segment(id))).await
    }

    pub async fn enable(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{TENANTS}/{}/enable", segment(id)))
            .await
    }

    pub async fn disable(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{TENANTS}/{}/disable", segment(id)))
            .await
    }

    pub async fn quota(&self, id: &str) -> ClientResult<TenantQuotaInfo> {
        self.http
            .get(&format!("{TENANTS}/{}/quota", segment(id)))
            .await
    }

    pub async fn update_quota(&self, id: &str, request: &TenantQuotaRequest) -> ClientResult<()> {
        self.http
            .put_void(&format!("{TENANTS}/{}/quota", segment(id)), request)
            .await
    }

    /// Tenant of the signed-in user
    pub async fn current(&self) -> ClientResult<TenantResponse> {
        self.http.get(&format!("{TENANTS}/current")).await
    }
}
