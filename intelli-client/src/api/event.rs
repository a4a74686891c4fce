//! Event center (`/event/v1`)

use shared::PageResult;
use shared::models::{
    EventConsumeRecord, EventDefinition, EventPublishRecord, EventQuery, EventStatistics,
    EventStatisticsQuery, EventSubscription, PublishEventRequest,
};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const DEFINITIONS: &str = "/event/v1/event-definitions";
const SUBSCRIPTIONS: &str = "/event/v1/event-subscriptions";
const RECORDS: &str = "/event/v1/records";

#[derive(Debug, Clone)]
pub struct EventApi {
    http: HttpPipeline,
}

impl EventApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    // ========== Definitions ==========

    pub async fn definitions(&self, query: &EventQuery) -> ClientResult<PageResult<EventDefinition>> {
        self.http.get_with(&format!("{DEFINITIONS}/list"), query).await
    }

    pub async fn definition(&self, id: &str) -> ClientResult<EventDefinition> {
        self.http.get(&format!("{DEFINITIONS}/{}", segment(id))).await
    }

    /// Returns the new definition's id
    pub async fn create_definition(&self, definition: &EventDefinition) -> ClientResult<String> {
        self.http
            .post(&format!("{DEFINITIONS}/create"), definition)
            .await
    }

    pub async fn update_definition(&self, id: &str, definition: &EventDefinition) -> ClientResult<()> {
        self.http
            .post_void(&format!("{DEFINITIONS}/{}/update", segment(id)), definition)
            .await
    }

    pub async fn delete_definition(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{DEFINITIONS}/{}/delete", segment(id)))
            .await
    }

    // ========== Subscriptions ==========

    pub async fn subscriptions(&self, query: &EventQuery) -> ClientResult<PageResult<EventSubscription>> {
        self.http.get_with(&format!("{SUBSCRIPTIONS}/list"), query).await
    }

    pub async fn subscription(&self, id: &str) -> ClientResult<EventSubscription> {
        self.http.get(&format!("{SUBSCRIPTIONS}/{}", segment(id))).await
    }

    /// Returns the new subscription's id
    pub async fn create_subscription(&self, subscription: &EventSubscription) -> ClientResult<String> {
        self.http
            .post(&format!("{SUBSCRIPTIONS}/create"), subscription)
            .await
    }

    pub async fn update_subscription(&self, id: &str, subscription: &EventSubscription) -> ClientResult<()> {
        self.http
            .post_void(&format!("{SUBSCRIPTIONS}/{}/update", segment(id)), subscription)
            .await
    }

    pub async fn delete_subscription(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{SUBSCRIPTIONS}/{}/delete", segment(id)))
            .await
    }

    pub async fn pause_subscription(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{SUBSCRIPTIONS}/{}/pause", segment(id)))
            .await
    }

    pub async fn resume_subscription(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{SUBSCRIPTIONS}/{}/resume", segment(id)))
            .await
    }

    // ========== Records ==========

    pub async fn publish_records(&self, query: &EventQuery) -> ClientResult<PageResult<EventPublishRecord>> {
        self.http.get_with(&format!("{RECORDS}/publish"), query).await
    }

    pub async fn consume_records(&self, query: &EventQuery) -> ClientResult<PageResult<EventConsumeRecord>> {
        self.http.get_with(&format!("{RECORDS}/consume"), query).await
    }

    pub async fn statistics(&self, query: &EventStatisticsQuery) -> ClientResult<Vec<EventStatistics>> {
        self.http.get_with("/event/v1/statistics", query).await
    }

    /// Publish a test event, returning its event id
    pub async fn publish(&self, request: &PublishEventRequest) -> ClientResult<String> {
        self.http.post("/event/v1/events/publish", request).await
    }
}
