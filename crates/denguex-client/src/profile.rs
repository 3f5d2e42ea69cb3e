use serde_json::json;

use denguex_types::api::ChangePasswordRequest;
use denguex_types::Profile;

use crate::error::ApiError;
use crate::ApiClient;

impl ApiClient {
    /// The backend serves the profile from a POST with an empty body.
    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        self.send_json(self.post("get-profile/").json(&json!({}))).await
    }

    pub async fn update_profile(&self, profile: &Profile) -> Result<(), ApiError> {
        self.send_ok(self.post("update-profile/").json(profile)).await
    }

    /// Confirmation mismatch is a client-side validation failure; nothing
    /// is sent until the two entries agree.
    pub async fn change_password(&self, new: &str, confirm: &str) -> Result<(), ApiError> {
        if new != confirm {
            return Err(ApiError::Validation("Passwords do not match.".into()));
        }
        if new.is_empty() {
            return Err(ApiError::Validation("Password cannot be empty.".into()));
        }
        let body = ChangePasswordRequest { new_password: new.into() };
        self.send_ok(self.post("change-password/").json(&body)).await
    }
}
