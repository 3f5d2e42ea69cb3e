use denguex_types::api::{ToggleBlockRequest, ToggleBlockResponse};
use denguex_types::normalize::RawUserAccount;
use denguex_types::UserAccount;

use crate::error::ApiError;
use crate::ApiClient;

impl ApiClient {
    /// Admin: the full user directory.
    pub async fn admin_users(&self) -> Result<Vec<UserAccount>, ApiError> {
        let raw: Vec<RawUserAccount> = self.send_json(self.get("admin/users/")).await?;
        Ok(raw.into_iter().map(RawUserAccount::normalize).collect())
    }

    /// Admin: flip one account's active flag. The response echoes the new
    /// server-side state, which is authoritative over whatever the caller
    /// rendered optimistically.
    pub async fn toggle_block(&self, user_id: i64) -> Result<ToggleBlockResponse, ApiError> {
        let body = ToggleBlockRequest { user_id };
        self.send_json(self.post("admin/toggle-block-user/").json(&body)).await
    }
}
