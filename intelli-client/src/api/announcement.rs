//! Platform announcements (`/platform/v1/announcements`)

use serde::Serialize;
use shared::models::Announcement;
use shared::response::PageResult;

use super::segment;
use crate::error::ClientResult;
use crate::http::HttpPipeline;

const ANNOUNCEMENTS: &str = "/platform/v1/announcements";

#[derive(Debug, Serialize)]
struct PageQuery {
    page: u32,
    size: u32,
}

#[derive(Debug, Serialize)]
struct LimitQuery {
    limit: u32,
}

#[derive(Debug, Clone)]
pub struct AnnouncementApi {
    http: HttpPipeline,
}

impl AnnouncementApi {
    pub fn new(http: HttpPipeline) -> Self {
        Self { http }
    }

    pub async fn list(&self, page: u32, size: u32) -> ClientResult<PageResult<Announcement>> {
        self.http
            .get_with(ANNOUNCEMENTS, &PageQuery { page, size })
            .await
    }

    /// Latest published announcements
    pub async fn published(&self, limit: u32) -> ClientResult<Vec<Announcement>> {
        self.http
            .get_with(&format!("{ANNOUNCEMENTS}/published"), &LimitQuery { limit })
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Announcement> {
        self.http
            .get(&format!("{ANNOUNCEMENTS}/{}", segment(id)))
            .await
    }

    pub async fn create(&self, announcement: &Announcement) -> ClientResult<Announcement> {
        self.http.post(ANNOUNCEMENTS, announcement).await
    }

    pub async fn update(&self, id: &str, announcement: &Announcement) -> ClientResult<Announcement> {
        self.http
            .put(&format!("{ANNOUNCEMENTS}/{}", segment(id)), announcement)
            .await
    }

    pub async fn publish(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{ANNOUNCEMENTS}/{}/publish", segment(id)))
            .await
    }

    pub async fn unpublish(&self, id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("{ANNOUNCEMENTS}/{}/unpublish", segment(id)))
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http
            .delete(&format!("{ANNOUNCEMENTS}/{}", segment(id)))
            .await
    }
}
