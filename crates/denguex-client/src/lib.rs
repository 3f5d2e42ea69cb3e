//! HTTP client for the DengueX surveillance backend.
//!
//! One [`ApiClient`] instance is shared by every screen. It attaches the
//! stored auth token to outbound requests, maps transport and status
//! failures onto the [`ApiError`] taxonomy, and runs every payload through
//! the `denguex-types` normalizer before handing it to callers.

pub mod auth;
pub mod chat;
pub mod content;
pub mod error;
pub mod geo;
pub mod lab;
pub mod profile;
pub mod reports;
pub mod session;
pub mod stats;
pub mod users;

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

pub use error::ApiError;
pub use geo::GeoClient;
pub use session::SessionStore;

/// Environment-driven configuration, defaulted like a dev setup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API root, e.g. `http://127.0.0.1:8000/api`.
    pub api_base: String,
    /// Where the session JSON is persisted between runs.
    pub session_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let api_base = std::env::var("DENGUEX_API_BASE")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/api".into());
        let session_path = std::env::var("DENGUEX_SESSION_PATH")
            .unwrap_or_else(|_| "denguex-session.json".into());
        Self { api_base, session_path: PathBuf::from(session_path) }
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    origin: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("denguex-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let base = config.api_base.trim_end_matches('/').to_string();
        // The media origin is the API root minus its `/api` suffix; relative
        // image paths from the server are joined against it.
        let origin = base.strip_suffix("/api").unwrap_or(&base).to_string();

        Ok(Self { http, base, origin, session })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Backend origin used to absolutize relative media URLs.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Build a request for an API path, attaching `Authorization: Token ...`
    /// when a session exists. Requests are still issued without a token;
    /// the server's 401 comes back as [`ApiError::AuthRequired`].
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base, path.trim_start_matches('/'));
        let mut builder = self.http.request(method, url);
        if let Some(session) = self.session.current() {
            builder = builder.header("Authorization", format!("Token {}", session.token));
        }
        builder
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    /// Send a request and decode its JSON body, mapping failures onto the
    /// error taxonomy. All endpoint modules funnel through here.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = builder.send().await.map_err(ApiError::from_transport)?;
        let resp = error::check_status(resp).await?;
        resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request where only success matters (delete/update acks).
    pub(crate) async fn send_ok(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let resp = builder.send().await.map_err(ApiError::from_transport)?;
        error::check_status(resp).await?;
        Ok(())
    }
}
