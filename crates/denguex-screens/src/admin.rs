//! Admin console: report review, user directory, city statistics and
//! content management.
//!
//! Mutations here render optimistically. The tentative value is staged on
//! top of the confirmed list and either committed when the server accepts
//! or rolled back with a notice when it refuses, so a failed call never
//! leaves phantom state on screen.

use std::sync::Arc;

use tracing::warn;

use denguex_client::{ApiClient, ApiError, GeoClient};
use denguex_types::api::{AddTipRequest, PostNewsRequest, UpdateStatsRequest};
use denguex_types::{CityStat, HealthTip, NewsItem, Report, ReportStatus, UserAccount};

use crate::state::{Pending, Slice};

// ── Pure list transforms ─────────────────────────────────────────────────

/// The reports list with one report's status rewritten.
fn with_status(reports: &[Report], id: i64, status: &str) -> Vec<Report> {
    reports
        .iter()
        .map(|r| {
            if r.id == id {
                let mut updated = r.clone();
                updated.status_text = status.to_string();
                updated.status = ReportStatus::parse(status);
                updated
            } else {
                r.clone()
            }
        })
        .collect()
}

/// The user list with one account's active flag flipped, or `None` when the
/// account is missing or an admin. Admin accounts are immutable here.
fn with_toggled(users: &[UserAccount], user_id: i64) -> Option<Vec<UserAccount>> {
    let target = users.iter().find(|u| u.id == user_id)?;
    if !target.is_mutable() {
        return None;
    }
    Some(
        users
            .iter()
            .map(|u| {
                let mut u = u.clone();
                if u.id == user_id {
                    u.is_active = !u.is_active;
                }
                u
            })
            .collect(),
    )
}

/// Overwrite one account's active flag with the server's echo.
fn with_echoed(users: &[UserAccount], user_id: i64, is_active: bool) -> Vec<UserAccount> {
    users
        .iter()
        .map(|u| {
            let mut u = u.clone();
            if u.id == user_id {
                u.is_active = is_active;
            }
            u
        })
        .collect()
}

// ── City stat form ───────────────────────────────────────────────────────

/// Admin input for creating or correcting one city's numbers. Coordinates
/// left blank are filled from a forward geocode when one succeeds.
#[derive(Debug, Clone, Default)]
pub struct CityStatForm {
    pub city_name: String,
    pub active_cases: u32,
    pub recovered: u32,
    pub deaths: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CityStatForm {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.city_name.trim().is_empty() {
            return Err(ApiError::Validation("City name is required.".into()));
        }
        Ok(())
    }
}

// ── Controller ───────────────────────────────────────────────────────────

pub struct AdminController {
    api: Arc<ApiClient>,
    geo: Arc<GeoClient>,
    pub reports: Slice<Pending<Vec<Report>>>,
    pub users: Slice<Pending<Vec<UserAccount>>>,
    pub cities: Slice<Vec<CityStat>>,
    pub news: Slice<Vec<NewsItem>>,
    pub tips: Slice<Vec<HealthTip>>,
    pub notice: Option<String>,
}

impl AdminController {
    pub fn new(api: Arc<ApiClient>, geo: Arc<GeoClient>) -> Self {
        Self {
            api,
            geo,
            reports: Slice::new(),
            users: Slice::new(),
            cities: Slice::new(),
            news: Slice::new(),
            tips: Slice::new(),
            notice: None,
        }
    }

    pub async fn load_reports(&mut self) {
        let ticket = self.reports.begin();
        let result = self.api.all_reports().await.map(Pending::new);
        self.reports.settle(ticket, result);
    }

    pub async fn load_users(&mut self) {
        let ticket = self.users.begin();
        let result = self.api.admin_users().await.map(Pending::new);
        self.users.settle(ticket, result);
    }

    pub async fn load_cities(&mut self) {
        let ticket = self.cities.begin();
        let result = self.api.dashboard_stats().await;
        self.cities.settle(ticket, result);
    }

    pub async fn load_content(&mut self) {
        let ticket = self.news.begin();
        let result = self.api.news().await;
        self.news.settle(ticket, result);

        let ticket = self.tips.begin();
        let result = self.api.health_tips().await;
        self.tips.settle(ticket, result);
    }

    /// Set a report's review status. The new status shows immediately and
    /// is committed or rolled back on the server's answer.
    pub async fn set_report_status(&mut self, id: i64, status: &str) {
        let Some(pending) = self.reports.ready_mut() else {
            return;
        };
        pending.stage(with_status(pending.current(), id, status));

        match self.api.update_report_status(id, status).await {
            Ok(()) => {
                if let Some(pending) = self.reports.ready_mut() {
                    pending.commit();
                }
            }
            Err(e) => {
                warn!(report = id, error = %e, "status update rejected");
                if let Some(pending) = self.reports.ready_mut() {
                    pending.roll_back();
                }
                self.notice = Some(format!("Status update failed: {e}"));
            }
        }
    }

    /// Block or unblock one account. Admin rows are refused locally; for
    /// the rest, the server's `is_active` echo wins over whatever was
    /// staged.
    pub async fn toggle_block(&mut self, user_id: i64) {
        let Some(pending) = self.users.ready_mut() else {
            return;
        };
        let Some(staged) = with_toggled(pending.current(), user_id) else {
            self.notice = Some("Admin accounts cannot be blocked.".into());
            return;
        };
        pending.stage(staged);

        match self.api.toggle_block(user_id).await {
            Ok(echo) => {
                if let Some(pending) = self.users.ready_mut() {
                    let confirmed = with_echoed(pending.current(), user_id, echo.is_active);
                    pending.confirm(confirmed);
                }
            }
            Err(e) => {
                if let Some(pending) = self.users.ready_mut() {
                    pending.roll_back();
                }
                self.notice = Some(format!("Could not update user: {e}"));
            }
        }
    }

    /// Create or correct one city's statistics, geocoding the city name
    /// when no coordinates were entered, then reload the grid.
    pub async fn upsert_city(&mut self, form: CityStatForm) -> Result<(), ApiError> {
        form.validate()?;

        let (latitude, longitude) = match (form.latitude, form.longitude) {
            (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            _ => match self.geo.geocode_city(&form.city_name).await {
                Some((lat, lon)) => (Some(lat), Some(lon)),
                None => (form.latitude, form.longitude),
            },
        };

        let req = UpdateStatsRequest {
            city_name: form.city_name.trim().to_string(),
            active_cases: form.active_cases,
            recovered: form.recovered,
            deaths: form.deaths,
            latitude,
            longitude,
        };
        self.api.update_stats(&req).await?;
        self.load_cities().await;
        Ok(())
    }

    pub async fn delete_city(&mut self, id: i64) -> Result<(), ApiError> {
        self.api.delete_city(id).await?;
        self.load_cities().await;
        Ok(())
    }

    pub async fn post_news(&mut self, req: &PostNewsRequest) -> Result<(), ApiError> {
        self.api.post_news(req).await?;
        self.load_content().await;
        Ok(())
    }

    pub async fn add_tip(&mut self, req: &AddTipRequest) -> Result<(), ApiError> {
        self.api.add_tip(req).await?;
        self.load_content().await;
        Ok(())
    }

    pub async fn delete_news(&mut self, id: i64) -> Result<(), ApiError> {
        self.api.delete_news(id).await?;
        self.load_content().await;
        Ok(())
    }

    pub async fn delete_tip(&mut self, id: i64) -> Result<(), ApiError> {
        self.api.delete_tip(id).await?;
        self.load_content().await;
        Ok(())
    }
}
