use std::sync::Arc;

use serde_json::json;

use clinic_shared::chat::{ChatReply, ChatSession};

use crate::api::ApiClient;
use crate::error::ApiError;

#[derive(Clone)]
pub struct ChatService {
    api: Arc<ApiClient>,
}

impl ChatService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn start(&self) -> Result<ChatSession, ApiError> {
        self.api.post("/chat/start/", &json!({})).await
    }

    pub async fn send(&self, session_id: &str, message: &str) -> Result<ChatReply, ApiError> {
        self.api
            .post(
                "/chat/message/",
                &json!({ "message": message, "session_id": session_id }),
            )
            .await
    }

    pub async fn end(&self, session_id: &str) -> Result<(), ApiError> {
        self.api
            .post_value("/chat/end/", &json!({ "session_id": session_id }))
            .await?;
        Ok(())
    }
}
