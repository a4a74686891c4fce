//! Search service (`/v1/search`)

use std::collections::BTreeMap;

use shared::models::{
    AggregateSearchRequest, AggregateSearchResponse, ApiSearchQuery, ApiSearchResult, IndexStats,
    SearchHealth, SearchResponse, SyncTarget,
};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const SEARCH: &str = "/v1/search";

#[derive(Debug, Clone)]
pub struct SearchApi {
    http: HttpPipeline,
}

impl SearchApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    /// Search every index at once
    pub async fn aggregate(&self, request: &AggregateSearchRequest) -> ClientResult<AggregateSearchResponse> {
        self.http.post(&format!("{SEARCH}/aggregate"), request).await
    }

    pub async fn apis(&self, query: &ApiSearchQuery) -> ClientResult<SearchResponse<ApiSearchResult>> {
        self.http.get_with(&format!("{SEARCH}/api"), query).await
    }

    pub async fn api(&self, id: &str) -> ClientResult<ApiSearchResult> {
        self.http.get(&format!("{SEARCH}/api/{}", segment(id))).await
    }

    pub async fn health(&self) -> ClientResult<SearchHealth> {
        self.http.get(&format!("{SEARCH}/health")).await
    }

    pub async fn indices(&self) -> ClientResult<BTreeMap<String, IndexStats>> {
        self.http.get(&format!("{SEARCH}/health/indices")).await
    }

    /// Start a reindex; the backend answers with a status message
    pub async fn sync(&self, target: SyncTarget) -> ClientResult<String> {
        self.http
            .post_for(&format!("{SEARCH}/sync/{}", target.path()))
            .await
    }
}
