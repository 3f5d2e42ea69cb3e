//! Chat screen: session list, ordered transcript, optimistic sends and
//! deletes.

use std::sync::Arc;

use denguex_client::{ApiClient, ApiError};
use denguex_types::api::ChatResponse;
use denguex_types::{ChatMessage, ChatSessionMeta};

use crate::state::Slice;

const SESSION_EXPIRED: &str = "Your session has expired. Please log out and log in again.";
const SEND_FAILED: &str = "Sorry, I couldn't reach the server. Please try again.";

/// Bookkeeping for an in-flight session delete, kept so a failure can put
/// everything back where it was.
struct StagedDelete {
    index: usize,
    entry: ChatSessionMeta,
    transcript: Vec<ChatMessage>,
    was_active: bool,
}

pub struct ChatController {
    api: Arc<ApiClient>,
    pub sessions: Slice<Vec<ChatSessionMeta>>,
    pub transcript: Vec<ChatMessage>,
    pub active: Option<i64>,
    pub notice: Option<String>,
}

impl ChatController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            sessions: Slice::new(),
            transcript: Vec::new(),
            active: None,
            notice: None,
        }
    }

    pub async fn load_sessions(&mut self) {
        let ticket = self.sessions.begin();
        let result = self.api.chat_sessions().await;
        self.sessions.settle(ticket, result);
    }

    /// Switch to a session and pull its history. The transcript is replaced
    /// wholesale; from then on it only grows.
    pub async fn open_session(&mut self, id: i64) -> Result<(), ApiError> {
        let messages = self.api.chat_messages(id).await?;
        self.active = Some(id);
        self.transcript = messages;
        Ok(())
    }

    pub fn start_new_session(&mut self) {
        self.active = None;
        self.transcript.clear();
    }

    /// Send one message. The user's line appears immediately; the bot's
    /// reply (or an error line styled as one) follows when the call lands.
    pub async fn send(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.transcript.push(ChatMessage::user(text));

        match self.api.send_chat(text, self.active).await {
            Ok(resp) => {
                if self.apply_reply(resp) {
                    self.load_sessions().await;
                }
            }
            Err(e) => self.apply_send_failure(&e),
        }
    }

    /// Fold a server reply into the transcript. Returns true when a new
    /// session id was adopted and the session list should be refreshed.
    fn apply_reply(&mut self, resp: ChatResponse) -> bool {
        let adopted = self.active.is_none() && resp.session_id.is_some();
        if let Some(id) = resp.session_id {
            self.active = Some(id);
        }
        self.transcript.push(ChatMessage::bot(resp.response));
        adopted
    }

    fn apply_send_failure(&mut self, err: &ApiError) {
        let line = if err.is_auth() { SESSION_EXPIRED } else { SEND_FAILED };
        self.transcript.push(ChatMessage::bot(line));
    }

    /// Delete a session: drop it from the list immediately, clear the
    /// transcript if it was the one on screen, and undo both if the server
    /// refuses.
    pub async fn delete_session(&mut self, id: i64) {
        let Some(staged) = self.stage_delete(id) else {
            return;
        };
        if let Err(e) = self.api.delete_chat(id).await {
            self.roll_back_delete(id, staged);
            self.notice = Some(format!("Could not delete chat: {e}"));
        }
    }

    fn stage_delete(&mut self, id: i64) -> Option<StagedDelete> {
        let list = self.sessions.ready_mut()?;
        let index = list.iter().position(|s| s.id == id)?;
        let entry = list.remove(index);
        let was_active = self.active == Some(id);
        let transcript = if was_active {
            self.active = None;
            std::mem::take(&mut self.transcript)
        } else {
            Vec::new()
        };
        Some(StagedDelete { index, entry, transcript, was_active })
    }

    fn roll_back_delete(&mut self, id: i64, staged: StagedDelete) {
        if let Some(list) = self.sessions.ready_mut() {
            let index = staged.index.min(list.len());
            list.insert(index, staged.entry);
        }
        if staged.was_active {
            self.active = Some(id);
            self.transcript = staged.transcript;
        }
    }
}
