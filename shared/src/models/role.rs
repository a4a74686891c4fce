//! Role Model

use serde::{Deserialize, Serialize};

/// Core role of a console user (mirrors the backend `RoleEnum`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Cross-tenant administrator, passes every permission check
    PlatformAdmin,
    /// Administrator of a single tenant
    TenantAdmin,
    /// Regular user; unknown role codes fall back here
    #[default]
    #[serde(other)]
    User,
}

impl UserRole {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PlatformAdmin => "platform_admin",
            Self::TenantAdmin => "tenant_admin",
            Self::User => "user",
        }
    }

    /// Whether the role is isolated to its own tenant
    pub fn is_tenant_isolated(&self) -> bool {
        !matches!(self, Self::PlatformAdmin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Role entity (RBAC 角色)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub sort: i32,
    pub status: String,
    pub tenant_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<i32>,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<i32>,
}

/// Replace the permissions granted to a role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePermissionsRequest {
    pub permission_ids: Vec<String>,
}

/// Grantable permission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub id: String,
    pub code: String,
    pub name: String,
    pub group_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub sort: i32,
}

/// Console menu node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub path: Option<String>,
    pub component: Option<String>,
    pub icon: Option<String>,
    pub permission: Option<String>,
    #[serde(rename = "type")]
    pub menu_type: i32,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub sort: i32,
    #[serde(default)]
    pub children: Vec<MenuResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes() {
        let role: UserRole = serde_json::from_str("\"platform_admin\"").unwrap();
        assert_eq!(role, UserRole::PlatformAdmin);
        assert_eq!(serde_json::to_string(&UserRole::TenantAdmin).unwrap(), "\"tenant_admin\"");
        assert_eq!(UserRole::User.to_string(), "user");
    }

    #[test]
    fn test_unknown_role_is_user() {
        let role: UserRole = serde_json::from_str("\"auditor\"").unwrap();
        assert_eq!(role, UserRole::User);
        assert!(role.is_tenant_isolated());
        assert!(!UserRole::PlatformAdmin.is_tenant_isolated());
    }

    #[test]
    fn test_menu_tree() {
        let json = r#"{"id":"1","name":"API","type":1,"visible":true,"children":[
            {"id":"2","parentId":"1","name":"List","path":"/console/api/list","permission":"api:list","type":2}
        ]}"#;
        let menu: MenuResponse = serde_json::from_str(json).unwrap();
        assert_eq!(menu.children.len(), 1);
        assert_eq!(menu.children[0].permission.as_deref(), Some("api:list"));
    }
}
