use reqwest::multipart::{Form, Part};

use denguex_types::api::{DeleteByIdRequest, UpdateStatusRequest};
use denguex_types::normalize::RawReport;
use denguex_types::Report;

use crate::error::ApiError;
use crate::ApiClient;

/// A report ready for submission. Screen-side validation guarantees the
/// image and area name are present before one of these is constructed.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub description: String,
    pub area_name: String,
    pub image: Vec<u8>,
    pub image_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NewReport {
    fn into_form(self) -> Form {
        // Coordinates are best-effort: absent ones go out as empty fields,
        // the same as a browser form with no geolocation permission.
        Form::new()
            .text("description", self.description)
            .text("area_name", self.area_name)
            .text("latitude", self.latitude.map(|v| v.to_string()).unwrap_or_default())
            .text("longitude", self.longitude.map(|v| v.to_string()).unwrap_or_default())
            .part("image", Part::bytes(self.image).file_name(self.image_name))
    }
}

impl ApiClient {
    /// Reports submitted by the current user.
    pub async fn my_reports(&self) -> Result<Vec<Report>, ApiError> {
        let raw: Vec<RawReport> = self.send_json(self.get("get-reports/")).await?;
        let origin = self.origin().to_string();
        Ok(raw.into_iter().map(|r| r.normalize(&origin)).collect())
    }

    pub async fn submit_report(&self, report: NewReport) -> Result<(), ApiError> {
        self.send_ok(self.post("submit-report/").multipart(report.into_form())).await
    }

    /// Admin: every report in the system.
    pub async fn all_reports(&self) -> Result<Vec<Report>, ApiError> {
        let raw: Vec<RawReport> = self.send_json(self.get("admin/all-reports/")).await?;
        let origin = self.origin().to_string();
        Ok(raw.into_iter().map(|r| r.normalize(&origin)).collect())
    }

    /// Admin: set the review status text of one report.
    pub async fn update_report_status(&self, id: i64, status: &str) -> Result<(), ApiError> {
        let body = UpdateStatusRequest { id, status: status.into() };
        self.send_ok(self.post("admin/update-status/").json(&body)).await
    }

    /// Admin: remove a city record entirely.
    pub async fn delete_city(&self, id: i64) -> Result<(), ApiError> {
        let body = DeleteByIdRequest { id };
        self.send_ok(self.post("admin/delete-city/").json(&body)).await
    }
}
