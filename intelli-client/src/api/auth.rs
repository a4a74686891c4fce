//! Authentication endpoints (`/iam/v1/auth`)

use async_trait::async_trait;
use shared::client::{
    CaptchaResponse, ChangePasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest,
    RegisterRequest, UserInfo,
};

use crate::error::ClientResult;
use crate::http::HttpPipeline;
use crate::session::ProfileSource;

const AUTH_BASE: &str = "/iam/v1/auth";

#[derive(Debug, Clone)]
pub struct AuthApi {
    http: HttpPipeline,
}

impl AuthApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        tracing::debug!(username = %request.username, "Logging in");
        self.http.post(&format!("{AUTH_BASE}/login"), request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<LoginResponse> {
        self.http.post(&format!("{AUTH_BASE}/register"), request).await
    }

    pub async fn captcha(&self) -> ClientResult<CaptchaResponse> {
        self.http.get(&format!("{AUTH_BASE}/captcha")).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> ClientResult<LoginResponse> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.http.post(&format!("{AUTH_BASE}/refresh"), &request).await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.http.post_empty(&format!("{AUTH_BASE}/logout")).await
    }

    pub async fn current_user(&self) -> ClientResult<UserInfo> {
        self.http.get(&format!("{AUTH_BASE}/me")).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ClientResult<()> {
        self.http
            .post_void(&format!("{AUTH_BASE}/password"), request)
            .await
    }
}

#[async_trait]
impl ProfileSource for AuthApi {
    async fn current_user(&self) -> ClientResult<UserInfo> {
        AuthApi::current_user(self).await
    }
}
