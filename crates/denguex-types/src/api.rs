use serde::{Deserialize, Serialize};

// -- Auth --

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The backend omits `token` on some error paths while still returning 200,
/// so it stays optional here and the client treats its absence as a failed
/// login rather than proceeding without a session.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct GoogleLoginRequest {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub security_question: String,
    pub security_answer: String,
}

#[derive(Debug, Serialize)]
pub struct SecurityQuestionRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub username: String,
    pub answer: String,
    pub new_password: String,
}

// -- Profile --

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

// -- Chat --

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub session_id: Option<i64>,
}

// -- Admin --

#[derive(Debug, Serialize)]
pub struct UpdateStatusRequest {
    pub id: i64,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteByIdRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct ToggleBlockRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ToggleBlockResponse {
    pub is_active: bool,
}

/// Upsert payload for a city record; coordinates stay optional so a city
/// can exist before it is geocoded.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatsRequest {
    pub city_name: String,
    pub active_cases: u32,
    pub recovered: u32,
    pub deaths: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostNewsRequest {
    pub title: String,
    pub content: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTipRequest {
    pub title: String,
    pub description: String,
}
