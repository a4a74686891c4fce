//! User management (`/iam/v1/users`)

use shared::PageData;
use shared::models::{
    AssignRolesRequest, CreateUserRequest, ResetPasswordResponse, UpdateUserRequest, UserQuery,
    UserResponse,
};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const USERS: &str = "/iam/v1/users";

#[derive(Debug, Clone)]
pub struct UserApi {
    http: HttpPipeline,
}

impl UserApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &UserQuery) -> ClientResult<PageData<UserResponse>> {
        self.http.get_with(USERS, query).await
    }

    pub async fn create(&self, request: &CreateUserRequest) -> ClientResult<UserResponse> {
        self.http.post(USERS, request).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<UserResponse> {
        self.http.get(&format!("{USERS}/{}", segment(id))).await
    }

    pub async fn update(&self, id: &str, request: &UpdateUserRequest) -> ClientResult<UserResponse> {
        self.http
            .put(&format!("{USERS}/{}", segment(id)), request)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&format!("{USERS}/{}", segment(id))).await
    }

    pub async fn enable(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{USERS}/{}/enable", segment(id)))
            .await
    }

    pub async fn disable(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{USERS}/{}/disable", segment(id)))
            .await
    }

    pub async fn reset_password(&self, id: &str) -> ClientResult<ResetPasswordResponse> {
        self.http
            .post_for(&format!("{USERS}/{}/reset-password", segment(id)))
            .await
    }

    pub async fn assign_roles(&self, id: &str, request: &AssignRolesRequest) -> ClientResult<()> {
        self.http
            .post_void(&format!("{USERS}/{}/roles", segment(id)), request)
            .await
    }
}
