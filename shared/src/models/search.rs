//! Search service models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Index a hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Api,
    App,
    User,
    Audit,
    Alert,
}

/// Cross-index search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSearchRequest {
    pub keyword: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<SearchType>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    #[serde(rename = "type")]
    pub item_type: SearchType,
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub highlights: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSearchResponse {
    pub total: u64,
    pub items: Vec<SearchItem>,
    /// Field → value → count
    #[serde(default)]
    pub facets: BTreeMap<String, BTreeMap<String, u64>>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_pages: u32,
    /// Milliseconds spent in the engine
    #[serde(default)]
    pub took: u64,
}

/// API document in the search index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResult {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub path: String,
    pub method: String,
    pub protocol: Option<String>,
    pub description: Option<String>,
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub status: Option<String>,
    pub status_name: Option<String>,
    pub version: Option<String>,
    pub tenant_id: Option<String>,
    pub created_by: Option<String>,
    pub creator_name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<T> {
    pub id: String,
    pub index: String,
    #[serde(default)]
    pub score: f64,
    pub source: T,
    #[serde(default)]
    pub highlights: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T> {
    pub total: u64,
    pub hits: Vec<SearchHit<T>>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub took: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexHealth {
    pub exists: bool,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Search engine health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHealth {
    /// UP or DOWN
    pub status: String,
    pub elasticsearch: String,
    #[serde(default)]
    pub indices: BTreeMap<String, IndexHealth>,
    #[serde(default)]
    pub timestamp: i64,
    pub error: Option<String>,
}

impl SearchHealth {
    pub fn is_up(&self) -> bool {
        self.status == "UP" && self.elasticsearch == "UP"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub exists: bool,
    pub doc_count: Option<u64>,
    pub error: Option<String>,
}

/// What a sync trigger rebuilds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    /// Every index
    All,
    ApiFull,
    ApiIncremental,
    AppFull,
    UserFull,
}

impl SyncTarget {
    /// Path below `/v1/search/sync`
    pub fn path(&self) -> &'static str {
        match self {
            Self::All => "full",
            Self::ApiFull => "api/full",
            Self::ApiIncremental => "api/incremental",
            Self::AppFull => "app/full",
            Self::UserFull => "user/full",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_request_omits_empty() {
        let request = AggregateSearchRequest {
            keyword: "订单".into(),
            types: vec![SearchType::Api, SearchType::App],
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"keyword": "订单", "types": ["api", "app"]}));
    }

    #[test]
    fn test_health() {
        let health: SearchHealth = serde_json::from_value(serde_json::json!({
            "status": "UP",
            "elasticsearch": "DOWN",
            "timestamp": 1
        }))
        .unwrap();
        assert!(!health.is_up());
        assert!(health.indices.is_empty());
    }
}
