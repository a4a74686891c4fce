//! Gateway call statistics models

use serde::{Deserialize, Serialize};

use crate::util::flexible_id;

/// Dashboard headline numbers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsOverview {
    pub today_total_count: u64,
    pub today_success_count: u64,
    pub today_fail_count: u64,
    pub today_success_rate: f64,
    pub today_avg_latency: f64,
    pub yesterday_total_count: u64,
    pub day_over_day_rate: f64,
    pub current_qps: f64,
    pub api_count: Option<u64>,
    pub app_count: Option<u64>,
}

/// Parallel series indexed by `time_points`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsTrend {
    pub time_points: Vec<String>,
    pub total_counts: Vec<u64>,
    pub success_counts: Vec<u64>,
    pub fail_counts: Vec<u64>,
    pub avg_latencies: Vec<f64>,
    pub success_rates: Vec<f64>,
}

impl StatsTrend {
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }
}

/// One gateway call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub tenant_id: Option<String>,
    pub api_id: Option<String>,
    pub api_path: String,
    pub api_method: Option<String>,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    pub client_ip: Option<String>,
    pub status_code: u16,
    pub success: bool,
    /// Milliseconds
    pub latency: u64,
    pub request_time: String,
    pub error_message: Option<String>,
    pub user_agent: Option<String>,
    pub request_body: Option<String>,
    pub response_body: Option<String>,
}

/// Daily aggregate of one API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopApiStats {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub tenant_id: Option<String>,
    pub api_id: Option<String>,
    pub api_path: String,
    pub app_id: Option<String>,
    pub stat_date: Option<String>,
    pub total_count: u64,
    pub success_count: u64,
    pub fail_count: u64,
    pub avg_latency: f64,
    pub max_latency: u64,
    pub min_latency: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}
