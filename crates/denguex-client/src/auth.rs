//! Login, federated login, signup and account recovery.

use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use denguex_types::api::{
    GoogleLoginRequest, LoginRequest, LoginResponse, ResetPasswordRequest, SecurityQuestionRequest,
    SignupRequest,
};
use denguex_types::normalize::security_question_from_payload;
use denguex_types::Session;

use crate::error::ApiError;
use crate::ApiClient;

/// Identity fields the client extracts from a federated id-token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FederatedIdentity {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Decode the payload segment of a JWT id-token without verifying the
/// signature — verification belongs to the identity provider and backend;
/// the client only needs the email and display name to forward.
pub fn decode_id_token(id_token: &str) -> Result<FederatedIdentity, ApiError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::Validation("malformed id token".into()))?;
    let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| ApiError::Validation("malformed id token payload".into()))?;
    serde_json::from_slice(&raw).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Signup password policy, checked before any request goes out.
pub fn password_meets_policy(password: &str) -> Result<(), ApiError> {
    let checks: [(&str, bool); 5] = [
        ("at least 8 characters", password.len() >= 8),
        ("an uppercase letter", password.chars().any(|c| c.is_ascii_uppercase())),
        ("a lowercase letter", password.chars().any(|c| c.is_ascii_lowercase())),
        ("a digit", password.chars().any(|c| c.is_ascii_digit())),
        ("a special character", password.chars().any(|c| !c.is_alphanumeric())),
    ];
    if let Some((what, _)) = checks.iter().find(|(_, ok)| !ok) {
        return Err(ApiError::Validation(format!("Password needs {what}.")));
    }
    Ok(())
}

impl ApiClient {
    /// Password login. Persists the session only when the response carries
    /// a token; a tokenless 200 is an explicit [`ApiError::MissingToken`]
    /// and the stored state stays untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let body = LoginRequest { username: username.into(), password: password.into() };
        let resp: LoginResponse = self.send_json(self.post("login/").json(&body)).await?;
        self.adopt_login(resp, username)
    }

    /// Federated login: decode the id-token locally, forward the identity.
    pub async fn login_with_federated_token(&self, id_token: &str) -> Result<Session, ApiError> {
        let identity = decode_id_token(id_token)?;
        let body = GoogleLoginRequest { email: identity.email, name: identity.name.clone() };
        let resp: LoginResponse = self.send_json(self.post("google-login/").json(&body)).await?;
        let fallback = identity.name;
        self.adopt_login(resp, &fallback)
    }

    fn adopt_login(&self, resp: LoginResponse, fallback_name: &str) -> Result<Session, ApiError> {
        let token = resp.token.filter(|t| !t.is_empty()).ok_or(ApiError::MissingToken)?;
        let session = Session {
            token,
            username: resp.username.unwrap_or_else(|| fallback_name.to_string()),
            is_admin: resp.is_admin,
        };
        self.session().store(session.clone())?;
        Ok(session)
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<(), ApiError> {
        password_meets_policy(&req.password)?;
        self.send_ok(self.post("signup/").json(req)).await
    }

    pub fn logout(&self) {
        self.session().clear();
    }

    /// Step one of account recovery: fetch the user's security question.
    pub async fn security_question(&self, username: &str) -> Result<String, ApiError> {
        let body = SecurityQuestionRequest { username: username.into() };
        let payload: Value = self.send_json(self.post("get-security-question/").json(&body)).await?;
        security_question_from_payload(&payload)
            .ok_or_else(|| ApiError::Validation("Security question not set for this user.".into()))
    }

    /// Step two: answer the question and set a new password.
    pub async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.send_ok(self.post("reset-password-secure/").json(req)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientConfig, SessionStore};
    use std::sync::Arc;

    fn client(name: &str) -> (ApiClient, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("denguex_auth_test_{name}.json"));
        let _ = std::fs::remove_file(&path);
        let config = ClientConfig {
            api_base: "http://127.0.0.1:8000/api".into(),
            session_path: path.clone(),
        };
        let store = Arc::new(SessionStore::open(&path));
        (ApiClient::new(&config, store).unwrap(), path)
    }

    #[test]
    fn tokenless_login_response_leaves_store_untouched() {
        let (api, path) = client("no_token");
        let resp = LoginResponse { token: None, username: Some("amna".into()), is_admin: false };
        let err = api.adopt_login(resp, "amna").unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
        assert!(!api.session().is_logged_in());
        assert!(!path.exists());
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let (api, path) = client("empty_token");
        let resp = LoginResponse { token: Some(String::new()), username: None, is_admin: true };
        let err = api.adopt_login(resp, "amna").unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
        assert!(!api.session().is_logged_in());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn token_bearing_response_stores_session() {
        let (api, path) = client("with_token");
        let resp = LoginResponse {
            token: Some("t-9".into()),
            username: Some("amna".into()),
            is_admin: true,
        };
        let session = api.adopt_login(resp, "fallback").unwrap();
        assert_eq!(session.username, "amna");
        assert!(api.session().is_logged_in());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn id_token_payload_decodes() {
        // header.payload.signature with payload {"email":"a@b.pk","name":"Ali"}
        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(br#"{"email":"a@b.pk","name":"Ali"}"#);
        let token = format!("eyJhbGciOiJSUzI1NiJ9.{payload}.sig");
        let identity = decode_id_token(&token).unwrap();
        assert_eq!(identity.email, "a@b.pk");
        assert_eq!(identity.name, "Ali");
    }

    #[test]
    fn malformed_id_token_is_validation_error() {
        assert!(matches!(decode_id_token("no-dots"), Err(ApiError::Validation(_))));
        assert!(matches!(decode_id_token("a.!!!.c"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn password_policy_names_first_missing_rule() {
        assert!(password_meets_policy("Str0ng!pass").is_ok());
        let err = password_meets_policy("short").unwrap_err();
        assert!(err.to_string().contains("8 characters"));
        let err = password_meets_policy("alllowercase1!").unwrap_err();
        assert!(err.to_string().contains("uppercase"));
    }
}
