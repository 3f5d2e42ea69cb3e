//! Lab screen: mosquito photo identification.

use std::sync::Arc;

use denguex_client::{ApiClient, ApiError};
use denguex_types::IdentifyResult;

use crate::state::Slice;

pub struct LabController {
    api: Arc<ApiClient>,
    pub image: Option<(Vec<u8>, String)>,
    /// Replaced wholesale on every attempt; earlier results do not linger.
    pub result: Slice<IdentifyResult>,
}

impl LabController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, image: None, result: Slice::new() }
    }

    pub fn select_image(&mut self, bytes: Vec<u8>, file_name: impl Into<String>) {
        self.image = Some((bytes, file_name.into()));
    }

    /// Run identification on the selected image. No image means no request.
    pub async fn identify(&mut self) -> Result<(), ApiError> {
        let Some((bytes, name)) = self.image.clone() else {
            return Err(ApiError::Validation("Please select an image first.".into()));
        };
        let ticket = self.result.begin();
        let result = self.api.identify_mosquito(bytes, &name).await;
        self.result.settle(ticket, result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use denguex_client::{ClientConfig, SessionStore};

    fn controller() -> LabController {
        let config = ClientConfig {
            api_base: "http://127.0.0.1:8000/api".into(),
            session_path: std::env::temp_dir().join("denguex-lab-test.json"),
        };
        let store = Arc::new(SessionStore::open(&config.session_path));
        LabController::new(Arc::new(ApiClient::new(&config, store).unwrap()))
    }

    #[tokio::test]
    async fn identify_without_image_is_rejected_locally() {
        let mut lab = controller();
        let err = lab.identify().await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        // No load was ever started.
        assert!(lab.result.ready().is_none());
        assert!(!lab.result.state().is_loading());
    }
}
