//! Gateway rate-limit policies (`/v1/gateway/ratelimit/policies`)

use shared::models::{ApplyPolicyRequest, RatelimitPolicy, RatelimitPolicyQuery};
use shared::response::PageResult;

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const POLICIES: &str = "/v1/gateway/ratelimit/policies";

#[derive(Debug, Clone)]
pub struct RatelimitApi {
    http: HttpPipeline,
}

impl RatelimitApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &RatelimitPolicyQuery) -> ClientResult<PageResult<RatelimitPolicy>> {
        self.http.get_with(POLICIES, query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<RatelimitPolicy> {
        self.http.get(&format!("{POLICIES}/{}", segment(id))).await
    }

    pub async fn create(&self, policy: &RatelimitPolicy) -> ClientResult<RatelimitPolicy> {
        self.http.post(POLICIES, policy).await
    }

    pub async fn update(&self, id: &str, policy: &RatelimitPolicy) -> ClientResult<RatelimitPolicy> {
        self.http
            .put(&format!("{POLICIES}/{}", segment(id)), policy)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&format!("{POLICIES}/{}", segment(id))).await
    }

    pub async fn apply(&self, policy_id: &str, request: &ApplyPolicyRequest) -> ClientResult<()> {
        self.http
            .post_void(&format!("{POLICIES}/{}/apply", segment(policy_id)), request)
            .await
    }

    pub async fn remove_from_route(&self, policy_id: &str, route_id: &str) -> ClientResult<()> {
        self.http
            .delete(&format!(
                "{POLICIES}/{}/routes/{}",
                segment(policy_id),
                segment(route_id)
            ))
            .await
    }
}
