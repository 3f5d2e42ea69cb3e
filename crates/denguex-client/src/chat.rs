use reqwest::Method;

use denguex_types::api::{ChatRequest, ChatResponse};
use denguex_types::normalize::{RawChatMessage, RawChatSession};
use denguex_types::{ChatMessage, ChatSessionMeta};

use crate::error::ApiError;
use crate::ApiClient;

impl ApiClient {
    pub async fn chat_sessions(&self) -> Result<Vec<ChatSessionMeta>, ApiError> {
        let raw: Vec<RawChatSession> = self.send_json(self.get("chat-sessions/")).await?;
        Ok(raw.into_iter().map(RawChatSession::normalize).collect())
    }

    pub async fn chat_messages(&self, session_id: i64) -> Result<Vec<ChatMessage>, ApiError> {
        let raw: Vec<RawChatMessage> =
            self.send_json(self.get(&format!("chat-messages/{session_id}/"))).await?;
        Ok(raw.into_iter().map(RawChatMessage::normalize).collect())
    }

    /// Send one message. `session_id` of `None` asks the server to open a
    /// new session; the response carries the assigned id either way.
    pub async fn send_chat(
        &self,
        message: &str,
        session_id: Option<i64>,
    ) -> Result<ChatResponse, ApiError> {
        let body = ChatRequest { message: message.into(), session_id };
        self.send_json(self.post("chat/").json(&body)).await
    }

    pub async fn delete_chat(&self, session_id: i64) -> Result<(), ApiError> {
        self.send_ok(self.request(Method::DELETE, &format!("delete-chat/{session_id}/"))).await
    }
}
