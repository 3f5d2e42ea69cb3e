//! Report screen: draft validation, location prefill, multipart submission
//! and the user's own report history.

use std::sync::Arc;

use denguex_client::reports::NewReport;
use denguex_client::{ApiClient, ApiError, GeoClient};
use denguex_types::Report;

use crate::state::Slice;

/// Where the device's position comes from. The client core has no GPS of
/// its own; the embedding shell provides one, and `None` never blocks a
/// submission.
pub trait LocationSource {
    fn current_location(&self) -> Option<(f64, f64)>;
}

/// A no-location source for headless use.
pub struct NoLocation;

impl LocationSource for NoLocation {
    fn current_location(&self) -> Option<(f64, f64)> {
        None
    }
}

/// The form the user is editing. The image is required, the coordinates
/// are not.
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    pub description: String,
    pub area_name: String,
    pub image: Option<(Vec<u8>, String)>,
    pub location: Option<(f64, f64)>,
}

impl ReportDraft {
    /// Validation gate. Nothing goes near the network until this passes;
    /// a rejected draft stays editable as-is.
    pub fn validate(&self) -> Result<NewReport, ApiError> {
        let Some((image, image_name)) = self.image.clone() else {
            return Err(ApiError::Validation("Please select an image before submitting.".into()));
        };
        if self.area_name.trim().is_empty() {
            return Err(ApiError::Validation("Area name is required.".into()));
        }
        let (latitude, longitude) = match self.location {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };
        Ok(NewReport {
            description: self.description.clone(),
            area_name: self.area_name.trim().to_string(),
            image,
            image_name,
            latitude,
            longitude,
        })
    }
}

pub struct ReportController {
    api: Arc<ApiClient>,
    geo: Arc<GeoClient>,
    pub draft: ReportDraft,
    pub history: Slice<Vec<Report>>,
}

impl ReportController {
    pub fn new(api: Arc<ApiClient>, geo: Arc<GeoClient>) -> Self {
        Self { api, geo, draft: ReportDraft::default(), history: Slice::new() }
    }

    pub async fn load_history(&mut self) {
        let ticket = self.history.begin();
        let result = self.api.my_reports().await;
        self.history.settle(ticket, result);
    }

    /// Capture the device position and prefill the area name from a reverse
    /// geocode. The prefill never clobbers text the user already typed.
    pub async fn capture_location(&mut self, source: &dyn LocationSource) {
        let Some((lat, lon)) = source.current_location() else {
            return;
        };
        self.draft.location = Some((lat, lon));
        if self.draft.area_name.trim().is_empty() {
            if let Some(locality) = self.geo.reverse_geocode(lat, lon).await {
                self.draft.area_name = locality;
            }
        }
    }

    /// Validate, submit, then refresh the history. The draft is reset only
    /// after the server accepts it.
    pub async fn submit(&mut self) -> Result<(), ApiError> {
        let report = self.draft.validate()?;
        self.api.submit_report(report).await?;
        self.draft = ReportDraft::default();
        self.load_history().await;
        Ok(())
    }
}
