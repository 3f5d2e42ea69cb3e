use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};

use denguex_types::Session;

use crate::error::ApiError;

/// Durable single-writer session storage.
///
/// The file plays the role the browser's local storage played: it holds the
/// token, username and admin flag between runs. Only login writes and only
/// logout clears; every authenticated request reads. A corrupt or missing
/// file reads as logged-out rather than erroring.
pub struct SessionStore {
    path: PathBuf,
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    pub fn open(path: &Path) -> Self {
        let current = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => {
                    info!(username = %session.username, "restored session from {}", path.display());
                    Some(session)
                }
                Err(e) => {
                    warn!("ignoring corrupt session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(_) => None,
        };

        Self { path: path.to_path_buf(), current: Mutex::new(current) }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.lock().expect("session lock poisoned").clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current().is_some()
    }

    /// Persist a fresh session. Called from the login paths only.
    pub fn store(&self, session: Session) -> Result<(), ApiError> {
        let raw = serde_json::to_string_pretty(&session)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| ApiError::Storage(e.to_string()))?;
        info!(username = %session.username, is_admin = session.is_admin, "session stored");
        *self.current.lock().expect("session lock poisoned") = Some(session);
        Ok(())
    }

    /// Drop the session in memory and on disk. Failure to remove the file
    /// is not fatal; the in-memory state is authoritative for this process.
    pub fn clear(&self) {
        *self.current.lock().expect("session lock poisoned") = None;
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("could not remove session file {}: {}", self.path.display(), e);
            }
        }
        info!("session cleared");
    }
}
