//! AI generation service (`/aigc/v1/aigc`)

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use shared::models::{
    AigcStatistics, ChatRequest, ChatResponse, ConversationHistory, CostForecast, CostOverview,
    ModelInfo, ModelRankingList, PromptTemplate, QuotaUsage, TextGenerationRequest,
    TextGenerationResponse,
};

use super::segment;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpPipeline;
use crate::stream;

const AIGC: &str = "/aigc/v1/aigc";

pub const STREAM_CHAT_PATH: &str = "/aigc/v1/aigc/stream/chat/completions";
pub const STREAM_TEXT_PATH: &str = "/aigc/v1/aigc/stream/text/generate";

#[derive(Debug, Serialize)]
struct DaysQuery {
    days: u32,
}

#[derive(Debug, Serialize)]
struct LimitQuery {
    limit: u32,
}

#[derive(Debug, Serialize)]
struct TemplateQuery<'a> {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct AigcApi {
    http: HttpPipeline,
}

impl AigcApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    // ========== Generation ==========

    pub async fn generate_text(&self, request: &TextGenerationRequest) -> ClientResult<TextGenerationResponse> {
        self.http.post(&format!("{AIGC}/text/generate"), request).await
    }

    pub async fn chat(&self, request: &ChatRequest) -> ClientResult<ChatResponse> {
        self.http
            .post(&format!("{AIGC}/chat/completions"), request)
            .await
    }

    /// Model names
    pub async fn models(&self) -> ClientResult<Vec<String>> {
        self.http.get(&format!("{AIGC}/models")).await
    }

    pub async fn model_info(&self) -> ClientResult<Vec<ModelInfo>> {
        self.http.get(&format!("{AIGC}/models/info")).await
    }

    // ========== Streaming ==========

    /// Stream a chat completion.
    ///
    /// Fragments arrive through `on_message`; exactly one of `on_complete`
    /// and `on_error` is called at the end.
    pub async fn stream_chat<M, C, E>(&self, request: &ChatRequest, on_message: M, on_complete: C, on_error: E)
    where
        M: FnMut(String),
        C: FnOnce(),
        E: FnOnce(ClientError),
    {
        self.stream(STREAM_CHAT_PATH, request, on_message, on_complete, on_error)
            .await
    }

    /// Stream a text generation
    pub async fn stream_text<M, C, E>(
        &self,
        request: &TextGenerationRequest,
        on_message: M,
        on_complete: C,
        on_error: E,
    ) where
        M: FnMut(String),
        C: FnOnce(),
        E: FnOnce(ClientError),
    {
        self.stream(STREAM_TEXT_PATH, request, on_message, on_complete, on_error)
            .await
    }

    async fn stream<B, M, C, E>(&self, path: &str, body: &B, on_message: M, on_complete: C, on_error: E)
    where
        B: Serialize + ?Sized,
        M: FnMut(String),
        C: FnOnce(),
        E: FnOnce(ClientError),
    {
        match self.http.open_stream(path, body).await {
            Ok(response) => stream::read_response(response, on_message, on_complete, on_error).await,
            Err(e) => {
                tracing::warn!(path, error = %e, "Failed to open event stream");
                on_error(e)
            }
        }
    }

    // ========== Quota and history ==========

    pub async fn quota_usage(&self) -> ClientResult<QuotaUsage> {
        self.http.get(&format!("{AIGC}/quota/usage")).await
    }

    pub async fn conversation_history(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> ClientResult<Vec<ConversationHistory>> {
        self.http
            .get_with(
                &format!("{AIGC}/conversation/{}/history", segment(conversation_id)),
                &LimitQuery { limit },
            )
            .await
    }

    pub async fn clear_conversation_history(&self, conversation_id: &str) -> ClientResult<()> {
        self.http
            .delete(&format!(
                "{AIGC}/conversation/{}/history",
                segment(conversation_id)
            ))
            .await
    }

    // ========== Templates ==========

    /// Create a template, returning its id
    pub async fn create_template(&self, template: &PromptTemplate) -> ClientResult<String> {
        self.http.post(&format!("{AIGC}/templates"), template).await
    }

    pub async fn update_template(&self, id: &str, template: &PromptTemplate) -> ClientResult<()> {
        self.http
            .put_void(&format!("{AIGC}/templates/{}", segment(id)), template)
            .await
    }

    pub async fn delete_template(&self, id: &str) -> ClientResult<()> {
        self.http
            .delete(&format!("{AIGC}/templates/{}", segment(id)))
            .await
    }

    pub async fn template(&self, id: &str) -> ClientResult<PromptTemplate> {
        self.http
            .get(&format!("{AIGC}/templates/{}", segment(id)))
            .await
    }

    pub async fn templates(&self, kind: Option<&str>) -> ClientResult<Vec<PromptTemplate>> {
        self.http
            .get_with(&format!("{AIGC}/templates"), &TemplateQuery { kind })
            .await
    }

    /// Render a template by id
    pub async fn render_template(&self, id: &str, variables: &BTreeMap<String, Value>) -> ClientResult<String> {
        self.http
            .post(&format!("{AIGC}/templates/{}/render", segment(id)), variables)
            .await
    }

    /// Render a template by code
    pub async fn render_template_by_code(
        &self,
        code: &str,
        variables: &BTreeMap<String, Value>,
    ) -> ClientResult<String> {
        self.http
            .post(&format!("{AIGC}/templates/render/{}", segment(code)), variables)
            .await
    }

    // ========== Dashboard and cost ==========

    pub async fn statistics(&self, days: u32) -> ClientResult<AigcStatistics> {
        self.http
            .get_with(&format!("{AIGC}/dashboard/statistics"), &DaysQuery { days })
            .await
    }

    pub async fn model_ranking(&self, limit: u32) -> ClientResult<ModelRankingList> {
        self.http
            .get_with(&format!("{AIGC}/dashboard/model-ranking"), &LimitQuery { limit })
            .await
    }

    pub async fn cost_overview(&self, days: u32) -> ClientResult<CostOverview> {
        self.http
            .get_with(&format!("{AIGC}/cost/overview"), &DaysQuery { days })
            .await
    }

    pub async fn cost_forecast(&self) -> ClientResult<CostForecast> {
        self.http.get(&format!("{AIGC}/cost/forecast")).await
    }
}
