use serde_json::Value;

use denguex_types::api::UpdateStatsRequest;
use denguex_types::normalize::city_stats_from_payload;
use denguex_types::{CityStat, DailyCases};

use crate::error::ApiError;
use crate::ApiClient;

impl ApiClient {
    /// Public dashboard statistics. The envelope varies between backend
    /// versions; normalization flattens every known shape.
    pub async fn dashboard_stats(&self) -> Result<Vec<CityStat>, ApiError> {
        let payload: Value = self.send_json(self.get("dashboard-data/")).await?;
        Ok(city_stats_from_payload(payload))
    }

    /// Daily case series, optionally filtered server-side. Dates are ISO
    /// `YYYY-MM-DD`; `city` of "All" means no city filter.
    pub async fn analytics(
        &self,
        city: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<DailyCases>, ApiError> {
        let builder = self.get("analytics/").query(&[
            ("city", city),
            ("start_date", start_date),
            ("end_date", end_date),
        ]);
        self.send_json(builder).await
    }

    /// Admin: create or update one city's statistics.
    pub async fn update_stats(&self, req: &UpdateStatsRequest) -> Result<(), ApiError> {
        self.send_ok(self.post("admin/update-stats/").json(req)).await
    }
}
