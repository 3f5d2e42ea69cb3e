use reqwest::StatusCode;
use thiserror::Error;

/// Failure taxonomy for everything the client can hit.
///
/// `AuthRequired` deliberately carries its own user-facing message so the
/// screens can show "log in again" instead of a generic failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("Session expired. Please log out and log in again.")]
    AuthRequired,

    /// Client-side validation; raised before any request is built.
    #[error("{0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    /// The login endpoint answered without a token field. Treated as a
    /// failed login; the session store must not be touched.
    #[error("login succeeded but no token was returned")]
    MissingToken,

    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("session storage: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// True when the right user response is to re-authenticate.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

/// Map a non-success status onto the taxonomy, consuming the body for the
/// server-error message.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::AuthRequired),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        s if !s.is_success() => {
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::Server { status: s.as_u16(), body })
        }
        _ => Ok(resp),
    }
}
