//! Profile screen: view and edit the account profile, change the password.

use std::sync::Arc;

use denguex_client::{ApiClient, ApiError};
use denguex_types::Profile;

use crate::state::Slice;

pub struct ProfileController {
    api: Arc<ApiClient>,
    pub profile: Slice<Profile>,
    pub notice: Option<String>,
}

impl ProfileController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, profile: Slice::new(), notice: None }
    }

    pub async fn load(&mut self) {
        let ticket = self.profile.begin();
        let result = self.api.fetch_profile().await;
        self.profile.settle(ticket, result);
    }

    /// Header text; falls back to the username until a full name is set.
    pub fn display_name(&self) -> Option<&str> {
        self.profile.ready().map(Profile::display_name)
    }

    pub async fn save(&mut self, profile: Profile) -> Result<(), ApiError> {
        self.api.update_profile(&profile).await?;
        self.profile.put(profile);
        Ok(())
    }

    pub async fn change_password(&mut self, new: &str, confirm: &str) -> Result<(), ApiError> {
        self.api.change_password(new, confirm).await?;
        self.notice = Some("Password changed.".into());
        Ok(())
    }
}
