//! API management models
//!
//! Published API definitions, their groups, parameters, versions and backend
//! targets. Detail responses embed parameters, backend and call stats.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an API definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Draft,
    Published,
    Offline,
    Deprecated,
}

/// Which side of the call a parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Request,
    Response,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }
}

/// API definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub id: String,
    pub tenant_id: Option<String>,
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub name: String,
    pub code: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub method: String,
    pub path: String,
    pub protocol: Option<String>,
    pub content_type: Option<String>,
    /// Raw status; see [`ApiInfo::lifecycle`]
    pub status: String,
    pub auth_type: Option<String>,
    pub timeout: Option<u32>,
    pub retry_count: Option<u32>,
    #[serde(default)]
    pub cache_enabled: bool,
    pub cache_ttl: Option<u32>,
    #[serde(default)]
    pub rate_limit_enabled: bool,
    pub rate_limit_qps: Option<u32>,
    #[serde(default)]
    pub mock_enabled: bool,
    pub mock_response: Option<String>,
    #[serde(default)]
    pub today_calls: u64,
    #[serde(default)]
    pub total_calls: u64,
    pub created_by: Option<String>,
    pub creator_name: Option<String>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub request_params: Option<Vec<ApiParam>>,
    pub backend: Option<ApiBackend>,
    pub stats: Option<ApiStats>,
}

impl ApiInfo {
    /// Parsed lifecycle state; `None` for states this client does not know
    pub fn lifecycle(&self) -> Option<ApiStatus> {
        serde_json::from_value(serde_json::Value::String(self.status.to_lowercase())).ok()
    }
}

/// Call statistics embedded in an API detail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    pub today_calls: u64,
    pub total_calls: u64,
    pub success_calls: u64,
    pub success_rate: f64,
    pub avg_response_time: f64,
}

/// Request or response parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiParam {
    pub id: String,
    pub api_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    /// query, path, header or body
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub default_value: Option<String>,
    pub example: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub sort: i32,
}

/// Upstream the gateway forwards to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBackend {
    pub id: Option<String>,
    pub api_id: Option<String>,
    #[serde(rename = "type")]
    pub backend_type: Option<String>,
    pub protocol: Option<String>,
    pub method: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub timeout: Option<u32>,
    pub connect_timeout: Option<u32>,
}

/// API group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGroup {
    pub id: String,
    pub tenant_id: Option<String>,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    #[serde(default)]
    pub sort: i32,
    pub status: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub api_count: u32,
}

/// API list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Parameter payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiParamRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<i32>,
}

/// Backend payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBackendRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub backend_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u32>,
}

/// Create or update an API.
///
/// Creation requires `name`, `code`, `method` and `path`; updates send only
/// the fields that changed (`code` is immutable once created).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_qps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock_response: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub request_params: Vec<ApiParamRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<ApiBackendRequest>,
}

/// Create or update an API group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<i32>,
}

/// Snapshot of an API at a version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVersion {
    pub id: String,
    pub api_id: String,
    pub version: String,
    /// JSON snapshot of the definition
    pub snapshot: Option<String>,
    pub change_log: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiVersionRequest {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_log: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_info_lifecycle() {
        let info: ApiInfo = serde_json::from_value(serde_json::json!({
            "id": "a-1",
            "name": "Orders",
            "code": "orders",
            "method": "GET",
            "path": "/orders",
            "status": "PUBLISHED",
            "todayCalls": 12,
            "stats": {"todayCalls": 12, "totalCalls": 90, "successCalls": 88,
                      "successRate": 97.7, "avgResponseTime": 31.5}
        }))
        .unwrap();
        assert_eq!(info.lifecycle(), Some(ApiStatus::Published));
        assert_eq!(info.today_calls, 12);
        assert!(!info.cache_enabled);
        assert_eq!(info.stats.unwrap().success_calls, 88);
    }

    #[test]
    fn test_update_sends_only_changes() {
        let update = ApiRequest {
            description: Some("v2".into()),
            timeout: Some(3000),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"description": "v2", "timeout": 3000}));
    }
}
