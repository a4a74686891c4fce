//! Client-related types shared between the IAM service and the console
//!
//! Request/response DTOs of the `/iam/v1/auth` endpoints.

use serde::{Deserialize, Serialize};

use crate::models::UserRole;

// Re-export the envelope for convenience
pub use crate::response::Envelope;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            captcha_key: None,
            captcha: None,
        }
    }

    pub fn with_captcha(mut self, key: impl Into<String>, answer: impl Into<String>) -> Self {
        self.captcha_key = Some(key.into());
        self.captcha = Some(answer.into());
        self
    }
}

/// Registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
}

/// Login / register / refresh response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: UserInfo,
}

/// User information as returned by the IAM service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub role_names: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default)]
    pub last_login_ip: Option<String>,
}

/// Captcha challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaResponse {
    pub captcha_key: String,
    /// Base64 image
    pub captcha_image: String,
    pub expires_in: u64,
}

/// Refresh token request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Change password request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_skips_empty_captcha() {
        let json = serde_json::to_value(LoginRequest::new("alice", "pw")).unwrap();
        assert_eq!(json, serde_json::json!({"username": "alice", "password": "pw"}));

        let json = serde_json::to_value(LoginRequest::new("alice", "pw").with_captcha("k", "1234"))
            .unwrap();
        assert_eq!(json["captchaKey"], "k");
        assert_eq!(json["captcha"], "1234");
    }

    #[test]
    fn test_user_info_defaults() {
        let user: UserInfo =
            serde_json::from_str(r#"{"id":"u1","username":"bob","role":"tenant_admin"}"#).unwrap();
        assert_eq!(user.role, UserRole::TenantAdmin);
        assert!(user.permissions.is_empty());
        assert!(user.tenant_id.is_none());
    }

    #[test]
    fn test_login_response_camel_case() {
        let json = r#"{
            "accessToken": "a",
            "refreshToken": "r",
            "tokenType": "Bearer",
            "expiresIn": 7200,
            "user": {"id": "1", "username": "root", "role": "platform_admin", "tenantId": "t0"}
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "a");
        assert_eq!(resp.expires_in, Some(7200));
        assert_eq!(resp.user.role, UserRole::PlatformAdmin);
        assert_eq!(resp.user.tenant_id.as_deref(), Some("t0"));
    }
}
