//! API management (`/v1/apis`, `/v1/api-groups`, `/v1/public/apis`)

use serde::Serialize;
use shared::PageData;
use shared::models::{
    ApiBackend, ApiBackendRequest, ApiGroup, ApiGroupRequest, ApiInfo, ApiParam, ApiParamRequest,
    ApiQuery, ApiRequest, ApiVersion, CreateApiVersionRequest, ParamKind,
};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const APIS: &str = "/v1/apis";
const GROUPS: &str = "/v1/api-groups";
const MARKET: &str = "/v1/public/apis";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareQuery<'a> {
    version_id1: &'a str,
    version_id2: &'a str,
}

#[derive(Debug, Clone)]
pub struct ApiManageApi {
    http: HttpPipeline,
}

impl ApiManageApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    fn api(id: &str) -> String {
        format!("{APIS}/{}", segment(id))
    }

    // ========== Definitions ==========

    pub async fn list(&self, query: &ApiQuery) -> ClientResult<PageData<ApiInfo>> {
        self.http.get_with(&format!("{APIS}/list"), query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<ApiInfo> {
        self.http.get(&format!("{}/detail", Self::api(id))).await
    }

    pub async fn create(&self, request: &ApiRequest) -> ClientResult<ApiInfo> {
        self.http.post(&format!("{APIS}/create"), request).await
    }

    pub async fn update(&self, id: &str, request: &ApiRequest) -> ClientResult<ApiInfo> {
        self.http
            .post(&format!("{}/update", Self::api(id)), request)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http.post_empty(&format!("{}/delete", Self::api(id))).await
    }

    pub async fn publish(&self, id: &str) -> ClientResult<()> {
        self.http.post_empty(&format!("{}/publish", Self::api(id))).await
    }

    pub async fn offline(&self, id: &str) -> ClientResult<()> {
        self.http.post_empty(&format!("{}/offline", Self::api(id))).await
    }

    pub async fn deprecate(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{}/deprecate", Self::api(id)))
            .await
    }

    /// Duplicate a definition as a new draft
    pub async fn copy(&self, id: &str) -> ClientResult<ApiInfo> {
        self.http.post_for(&format!("{}/copy", Self::api(id))).await
    }

    // ========== Groups ==========

    pub async fn groups(&self) -> ClientResult<Vec<ApiGroup>> {
        self.http.get(&format!("{GROUPS}/list")).await
    }

    pub async fn group(&self, id: &str) -> ClientResult<ApiGroup> {
        self.http
            .get(&format!("{GROUPS}/{}/detail", segment(id)))
            .await
    }

    pub async fn create_group(&self, request: &ApiGroupRequest) -> ClientResult<ApiGroup> {
        self.http.post(&format!("{GROUPS}/create"), request).await
    }

    pub async fn update_group(&self, id: &str, request: &ApiGroupRequest) -> ClientResult<ApiGroup> {
        self.http
            .post(&format!("{GROUPS}/{}/update", segment(id)), request)
            .await
    }

    pub async fn delete_group(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{GROUPS}/{}/delete", segment(id)))
            .await
    }

    // ========== Parameters ==========

    fn params_path(api_id: &str, kind: ParamKind) -> String {
        format!("{}/params/{}", Self::api(api_id), kind.as_str())
    }

    pub async fn params(&self, api_id: &str, kind: ParamKind) -> ClientResult<Vec<ApiParam>> {
        self.http
            .get(&format!("{}/list", Self::params_path(api_id, kind)))
            .await
    }

    /// Replace every parameter of one kind
    pub async fn save_params(
        &self,
        api_id: &str,
        kind: ParamKind,
        params: &[ApiParamRequest],
    ) -> ClientResult<()> {
        self.http
            .post_void(&format!("{}/batch-save", Self::params_path(api_id, kind)), params)
            .await
    }

    pub async fn add_param(
        &self,
        api_id: &str,
        kind: ParamKind,
        param: &ApiParamRequest,
    ) -> ClientResult<ApiParam> {
        self.http
            .post(&format!("{}/add", Self::params_path(api_id, kind)), param)
            .await
    }

    pub async fn update_param(
        &self,
        api_id: &str,
        kind: ParamKind,
        param_id: &str,
        param: &ApiParamRequest,
    ) -> ClientResult<ApiParam> {
        self.http
            .post(
                &format!("{}/{}/update", Self::params_path(api_id, kind), segment(param_id)),
                param,
            )
            .await
    }

    pub async fn delete_param(&self, api_id: &str, kind: ParamKind, param_id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!(
                "{}/{}/delete",
                Self::params_path(api_id, kind),
                segment(param_id)
            ))
            .await
    }

    // ========== Versions ==========

    pub async fn versions(&self, api_id: &str) -> ClientResult<Vec<ApiVersion>> {
        self.http
            .get(&format!("{}/versions/list", Self::api(api_id)))
            .await
    }

    pub async fn version(&self, api_id: &str, version_id: &str) -> ClientResult<ApiVersion> {
        self.http
            .get(&format!(
                "{}/versions/{}/detail",
                Self::api(api_id),
                segment(version_id)
            ))
            .await
    }

    pub async fn create_version(
        &self,
        api_id: &str,
        request: &CreateApiVersionRequest,
    ) -> ClientResult<ApiVersion> {
        self.http
            .post(&format!("{}/versions/create", Self::api(api_id)), request)
            .await
    }

    pub async fn rollback(&self, api_id: &str, version_id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!(
                "{}/versions/{}/rollback",
                Self::api(api_id),
                segment(version_id)
            ))
            .await
    }

    pub async fn delete_version(&self, api_id: &str, version_id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!(
                "{}/versions/{}/delete",
                Self::api(api_id),
                segment(version_id)
            ))
            .await
    }

    /// Textual diff between two versions
    pub async fn compare_versions(&self, api_id: &str, first: &str, second: &str) -> ClientResult<String> {
        self.http
            .get_with(
                &format!("{}/versions/compare", Self::api(api_id)),
                &CompareQuery {
                    version_id1: first,
                    version_id2: second,
                },
            )
            .await
    }

    // ========== Backend ==========

    pub async fn backend(&self, api_id: &str) -> ClientResult<ApiBackend> {
        self.http
            .get(&format!("{}/backend/detail", Self::api(api_id)))
            .await
    }

    pub async fn save_backend(&self, api_id: &str, request: &ApiBackendRequest) -> ClientResult<ApiBackend> {
        self.http
            .post(&format!("{}/backend/save", Self::api(api_id)), request)
            .await
    }

    pub async fn delete_backend(&self, api_id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{}/backend/delete", Self::api(api_id)))
            .await
    }

    /// Whether the gateway can reach the given backend
    pub async fn test_backend(&self, api_id: &str, request: &ApiBackendRequest) -> ClientResult<bool> {
        self.http
            .post(&format!("{}/backend/test-connection", Self::api(api_id)), request)
            .await
    }

    // ========== Market ==========

    /// Published APIs of every tenant
    pub async fn market(&self, query: &ApiQuery) -> ClientResult<PageData<ApiInfo>> {
        self.http.get_with(&format!("{MARKET}/list"), query).await
    }

    pub async fn market_detail(&self, id: &str) -> ClientResult<ApiInfo> {
        self.http
            .get(&format!("{MARKET}/{}/detail", segment(id)))
            .await
    }
}
