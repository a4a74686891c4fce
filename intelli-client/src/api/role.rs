//! Roles, permissions and menus (`/iam/v1`)

use shared::models::{
    CreateRoleRequest, MenuResponse, PermissionResponse, RoleResponse, UpdateRolePermissionsRequest,
    UpdateRoleRequest,
};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const ROLES: &str = "/iam/v1/roles";

#[derive(Debug, Clone)]
pub struct RoleApi {
    http: HttpPipeline,
}

impl RoleApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> ClientResult<Vec<RoleResponse>> {
        self.http.get(ROLES).await
    }

    pub async fn create(&self, request: &CreateRoleRequest) -> ClientResult<RoleResponse> {
        self.http.post(ROLES, request).await
    }

    pub async fn update(&self, id: &str, request: &UpdateRoleRequest) -> ClientResult<RoleResponse> {
        self.http
            .put(&format!("{ROLES}/{}", segment(id)), request)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&format!("{ROLES}/{}", segment(id))).await
    }

    /// Permission codes granted to a role
    pub async fn permissions(&self, id: &str) -> ClientResult<Vec<String>> {
        self.http
            .get(&format!("{ROLES}/{}/permissions", segment(id)))
            .await
    }

    pub async fn update_permissions(
        &self,
        id: &str,
        request: &UpdateRolePermissionsRequest,
    ) -> ClientResult<()> {
        self.http
            .put_void(&format!("{ROLES}/{}/permissions", segment(id)), request)
            .await
    }

    /// Every permission the platform defines
    pub async fn list_permissions(&self) -> ClientResult<Vec<PermissionResponse>> {
        self.http.get("/iam/v1/permissions").await
    }

    pub async fn menu_tree(&self) -> ClientResult<Vec<MenuResponse>> {
        self.http.get("/iam/v1/menus").await
    }
}
