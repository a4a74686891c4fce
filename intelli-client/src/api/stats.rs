//! Gateway call statistics (`/governance/v1/stats`)

use serde::Serialize;
use shared::PageResult;
use shared::models::{CallLog, CallLogQuery, StatsOverview, StatsTrend, TopApiStats};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const STATS: &str = "/governance/v1/stats";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimeWindow<'a> {
    start_time: &'a str,
    end_time: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DateWindow<'a> {
    start_date: &'a str,
    end_date: &'a str,
}

#[derive(Debug, Serialize)]
struct LimitQuery {
    limit: u32,
}

/// Path key of an API in the stats service: `/v1/orders` becomes `v1_orders`
pub fn api_stats_key(api_path: &str) -> String {
    let path = api_path.strip_prefix('/').unwrap_or(api_path);
    path.replace('/', "_")
}

#[derive(Debug, Clone)]
pub struct StatsApi {
    http: HttpPipeline,
}

impl StatsApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    pub async fn overview(&self) -> ClientResult<StatsOverview> {
        self.http.get(&format!("{STATS}/overview")).await
    }

    pub async fn hourly_trend(&self, start_time: &str, end_time: &str) -> ClientResult<StatsTrend> {
        self.http
            .get_with(
                &format!("{STATS}/trend/hourly"),
                &TimeWindow { start_time, end_time },
            )
            .await
    }

    pub async fn daily_trend(&self, start_date: &str, end_date: &str) -> ClientResult<StatsTrend> {
        self.http
            .get_with(
                &format!("{STATS}/trend/daily"),
                &DateWindow { start_date, end_date },
            )
            .await
    }

    pub async fn api_trend(&self, api_path: &str, start_time: &str, end_time: &str) -> ClientResult<StatsTrend> {
        let key = api_stats_key(api_path);
        self.http
            .get_with(
                &format!("{STATS}/api/{}", segment(&key)),
                &TimeWindow { start_time, end_time },
            )
            .await
    }

    pub async fn top_apis(&self, limit: u32) -> ClientResult<Vec<TopApiStats>> {
        self.http
            .get_with(&format!("{STATS}/top"), &LimitQuery { limit })
            .await
    }

    pub async fn call_logs(&self, query: &CallLogQuery) -> ClientResult<PageResult<CallLog>> {
        self.http.get_with(&format!("{STATS}/logs"), query).await
    }

    /// Calls in the current realtime window
    pub async fn realtime_count(&self) -> ClientResult<u64> {
        self.http.get(&format!("{STATS}/realtime")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_stats_key() {
        assert_eq!(api_stats_key("/v1/orders/list"), "v1_orders_list");
        assert_eq!(api_stats_key("orders"), "orders");
        assert_eq!(api_stats_key("/"), "");
    }
}
