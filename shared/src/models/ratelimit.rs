//! Gateway rate-limit policy models

use serde::{Deserialize, Serialize};

/// How a policy counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatelimitType {
    Qps,
    Concurrency,
}

/// What a policy keys its counters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatelimitDimension {
    Global,
    Ip,
    Path,
    IpPath,
    User,
}

/// Rate-limit policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatelimitPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub limit_type: RatelimitType,
    pub dimension: RatelimitDimension,
    pub limit_value: u32,
    /// Window in seconds
    pub time_window: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_routes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Policy list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatelimitPolicyQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Apply a policy to gateway routes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPolicyRequest {
    pub route_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_wire_names() {
        let policy = RatelimitPolicy {
            id: None,
            name: "login-burst".into(),
            description: None,
            limit_type: RatelimitType::Qps,
            dimension: RatelimitDimension::IpPath,
            limit_value: 20,
            time_window: 1,
            status: None,
            applied_routes: None,
            created_by: None,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["type"], "qps");
        assert_eq!(json["dimension"], "ip_path");
        assert_eq!(json["limitValue"], 20);
        assert!(json.get("id").is_none());
    }
}
