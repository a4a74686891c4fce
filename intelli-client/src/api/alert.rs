//! Alert rules and records (`/governance/api/v1/alert`)

use shared::PageResult;
use shared::models::{AlertRecord, AlertRecordQuery, AlertRule, AlertRuleQuery, AlertStats, TimeRange};

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const RULES: &str = "/governance/api/v1/alert/rules";
const RECORDS: &str = "/governance/api/v1/alert/records";

#[derive(Debug, Clone)]
pub struct AlertApi {
    http: HttpPipeline,
}

impl AlertApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    // ========== Rules ==========

    pub async fn rules(&self, query: &AlertRuleQuery) -> ClientResult<PageResult<AlertRule>> {
        self.http.get_with(RULES, query).await
    }

    pub async fn rule(&self, id: &str) -> ClientResult<AlertRule> {
        self.http.get(&format!("{RULES}/{}", segment(id))).await
    }

    pub async fn create_rule(&self, rule: &AlertRule) -> ClientResult<AlertRule> {
        self.http.post(RULES, rule).await
    }

    pub async fn update_rule(&self, id: &str, rule: &AlertRule) -> ClientResult<AlertRule> {
        self.http.put(&format!("{RULES}/{}", segment(id)), rule).await
    }

    pub async fn delete_rule(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&format!("{RULES}/{}", segment(id))).await
    }

    pub async fn enable_rule(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{RULES}/{}/enable", segment(id)))
            .await
    }

    pub async fn disable_rule(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{RULES}/{}/disable", segment(id)))
            .await
    }

    // ========== Records ==========

    pub async fn records(&self, query: &AlertRecordQuery) -> ClientResult<PageResult<AlertRecord>> {
        self.http.get_with(RECORDS, query).await
    }

    pub async fn stats(&self, range: &TimeRange) -> ClientResult<AlertStats> {
        self.http.get_with(&format!("{RECORDS}/stats"), range).await
    }

    /// Close a firing alert by hand
    pub async fn resolve(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{RECORDS}/{}/resolve", segment(id)))
            .await
    }
}
