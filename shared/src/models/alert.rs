//! Governance alert models

use serde::{Deserialize, Serialize};

use crate::util::{flexible_id, flexible_id_opt};

/// Metric an alert rule watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertRuleType {
    ErrorRate,
    Latency,
    Qps,
}

/// Threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl AlertOperator {
    /// Whether `value` breaches `threshold`
    pub fn breached(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Gte => value >= threshold,
            Self::Lt => value < threshold,
            Self::Lte => value <= threshold,
            Self::Eq => value == threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
    Info,
}

/// Alert rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    #[serde(
        default,
        deserialize_with = "flexible_id_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub name: String,
    pub rule_type: AlertRuleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
    pub threshold: f64,
    pub operator: AlertOperator,
    /// Seconds the condition must hold
    pub duration: u32,
    /// Comma-separated channels: email, webhook, dingtalk, kafka
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_channels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_targets: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Fired alert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub tenant_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_id_opt")]
    pub rule_id: Option<String>,
    pub rule_name: Option<String>,
    pub api_id: Option<String>,
    pub api_path: Option<String>,
    pub alert_level: AlertLevel,
    pub alert_message: String,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub threshold_value: f64,
    /// firing or resolved
    pub status: String,
    pub fired_at: Option<String>,
    pub resolved_at: Option<String>,
    #[serde(default)]
    pub notified: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub total: u64,
    pub firing: u64,
    pub resolved: u64,
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRuleQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<AlertRuleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecordQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_level: Option<AlertLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Time window for aggregate endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_breach() {
        assert!(AlertOperator::Gt.breached(5.1, 5.0));
        assert!(!AlertOperator::Gt.breached(5.0, 5.0));
        assert!(AlertOperator::Gte.breached(5.0, 5.0));
        assert!(AlertOperator::Lt.breached(1.0, 2.0));
        assert!(AlertOperator::Eq.breached(2.0, 2.0));
    }

    #[test]
    fn test_record_numeric_ids() {
        let record: AlertRecord = serde_json::from_value(serde_json::json!({
            "id": 1790000000000000001i64,
            "ruleId": 12,
            "alertLevel": "critical",
            "alertMessage": "错误率超过阈值",
            "currentValue": 12.5,
            "thresholdValue": 5,
            "status": "firing"
        }))
        .unwrap();
        assert_eq!(record.id, "1790000000000000001");
        assert_eq!(record.rule_id.as_deref(), Some("12"));
        assert_eq!(record.alert_level, AlertLevel::Critical);
    }

    #[test]
    fn test_rule_wire_names() {
        let rule = AlertRule {
            id: None,
            tenant_id: None,
            name: "5xx".into(),
            rule_type: AlertRuleType::ErrorRate,
            api_id: None,
            api_path: Some("/orders".into()),
            threshold: 5.0,
            operator: AlertOperator::Gte,
            duration: 60,
            notify_channels: Some("email,webhook".into()),
            notify_targets: None,
            status: "enabled".into(),
            created_by: None,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["ruleType"], "error_rate");
        assert_eq!(json["operator"], "gte");
        assert!(json.get("id").is_none());
    }
}
