//! Application center models

use serde::{Deserialize, Serialize};

/// Registered client application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub id: String,
    pub tenant_id: Option<String>,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub app_type: Option<String>,
    pub app_key: String,
    pub status: String,
    #[serde(default)]
    pub quota_limit: u64,
    #[serde(default)]
    pub quota_used: u64,
    #[serde(default)]
    pub quota_usage_percent: f64,
    pub callback_url: Option<String>,
    /// Comma-separated
    pub ip_whitelist: Option<String>,
    pub expire_time: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub subscribed_api_count: u32,
    pub created_by_name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Credentials issued on creation or secret reset.
///
/// The secret is only ever returned here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCredentials {
    pub id: String,
    pub name: Option<String>,
    pub code: Option<String>,
    pub app_key: String,
    pub app_secret: String,
    pub status: Option<String>,
    pub quota_limit: Option<u64>,
    pub expire_time: Option<String>,
    pub created_at: Option<String>,
}

/// API subscription of an application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSubscription {
    pub id: String,
    pub app_id: String,
    pub api_id: String,
    pub api_name: Option<String>,
    pub api_path: Option<String>,
    pub status: String,
    pub quota_limit: Option<u64>,
    pub effective_time: Option<String>,
    pub expire_time: Option<String>,
    pub created_at: Option<String>,
}

/// Create or update an application; creation requires `name` and `code`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_whitelist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

/// Application list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeApiRequest {
    pub api_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<String>,
}
