use denguex_types::api::{AddTipRequest, DeleteByIdRequest, PostNewsRequest};
use denguex_types::normalize::{RawHealthTip, RawNewsItem};
use denguex_types::{HealthTip, NewsItem};

use crate::error::ApiError;
use crate::ApiClient;

impl ApiClient {
    /// Publicly readable news feed. An empty list is an empty state, not
    /// an error.
    pub async fn news(&self) -> Result<Vec<NewsItem>, ApiError> {
        let raw: Vec<RawNewsItem> = self.send_json(self.get("news/")).await?;
        Ok(raw.into_iter().map(RawNewsItem::normalize).collect())
    }

    pub async fn health_tips(&self) -> Result<Vec<HealthTip>, ApiError> {
        let raw: Vec<RawHealthTip> = self.send_json(self.get("health-tips/")).await?;
        Ok(raw.into_iter().map(RawHealthTip::normalize).collect())
    }

    pub async fn post_news(&self, req: &PostNewsRequest) -> Result<(), ApiError> {
        self.send_ok(self.post("admin/post-news/").json(req)).await
    }

    pub async fn add_tip(&self, req: &AddTipRequest) -> Result<(), ApiError> {
        self.send_ok(self.post("admin/add-tip/").json(req)).await
    }

    pub async fn delete_news(&self, id: i64) -> Result<(), ApiError> {
        self.send_ok(self.post("admin/delete-news/").json(&DeleteByIdRequest { id })).await
    }

    pub async fn delete_tip(&self, id: i64) -> Result<(), ApiError> {
        self.send_ok(self.post("admin/delete-tip/").json(&DeleteByIdRequest { id })).await
    }
}
