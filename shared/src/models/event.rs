//! Event center models

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    System,
    Business,
    Custom,
}

/// How a subscriber receives events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriberType {
    Webhook,
    Mq,
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetryStrategy {
    None,
    Fixed,
    Exponential,
}

/// Event definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub event_code: String,
    pub event_name: String,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema of the payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_definition: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Event subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub event_code: String,
    pub subscriber_type: SubscriberType,
    pub subscriber_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_method: Option<String>,
    /// JSON object of extra headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_headers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mq_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mq_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,
    pub retry_strategy: RetryStrategy,
    pub max_retry_times: u32,
    pub timeout_seconds: u32,
    /// ACTIVE, INACTIVE or PAUSED
    pub status: String,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPublishRecord {
    pub id: String,
    pub tenant_id: Option<String>,
    pub event_code: String,
    pub event_id: String,
    pub event_data: Option<String>,
    pub source: Option<String>,
    pub publish_time: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConsumeRecord {
    pub id: String,
    pub tenant_id: Option<String>,
    pub subscription_id: String,
    pub event_id: String,
    pub event_code: String,
    pub event_data: Option<String>,
    pub consume_time: Option<String>,
    /// SUCCESS, FAILED, RETRYING or PENDING
    pub status: String,
    #[serde(default)]
    pub retry_times: u32,
    pub next_retry_time: Option<String>,
    pub response_code: Option<i32>,
    pub response_body: Option<String>,
    pub error_message: Option<String>,
    /// Milliseconds
    pub cost_time: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Daily per-event counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatistics {
    pub id: String,
    pub tenant_id: Option<String>,
    pub event_code: String,
    pub stat_date: String,
    #[serde(default)]
    pub publish_count: u64,
    #[serde(default)]
    pub consume_count: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failed_count: u64,
    #[serde(default)]
    pub avg_cost_time: f64,
    #[serde(default)]
    pub max_cost_time: u64,
}

/// Filters shared by the event list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatisticsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Publish a test event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEventRequest {
    pub event_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_enums() {
        let sub: EventSubscription = serde_json::from_value(serde_json::json!({
            "id": "s-1",
            "eventCode": "order.created",
            "subscriberType": "WEBHOOK",
            "subscriberName": "billing",
            "callbackUrl": "https://billing.local/hook",
            "retryStrategy": "EXPONENTIAL",
            "maxRetryTimes": 3,
            "timeoutSeconds": 10,
            "status": "ACTIVE",
            "priority": 1
        }))
        .unwrap();
        assert_eq!(sub.subscriber_type, SubscriberType::Webhook);
        assert_eq!(sub.retry_strategy, RetryStrategy::Exponential);

        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["subscriberType"], "WEBHOOK");
        assert!(json.get("mqTopic").is_none());
    }
}
