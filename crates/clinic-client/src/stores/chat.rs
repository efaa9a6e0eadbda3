use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info, warn};

use clinic_shared::chat::{ChatMessage, ChatReply, ChatSession};
use clinic_shared::Sender;

use crate::error::ApiError;
use crate::services::ChatService;
use crate::stores::{lock, ActionScope, Status, StoreState};

const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Default)]
struct ChatState {
    messages: Vec<ChatMessage>,
    session_id: Option<String>,
    next_id: u64,
    status: Status,
}

impl ChatState {
    fn push(&mut self, sender: Sender, content: String) -> &mut ChatMessage {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            content,
            sender,
            timestamp: Utc::now(),
            metadata: None,
            is_error: false,
        });
        let last = self.messages.len() - 1;
        &mut self.messages[last]
    }
}

impl StoreState for ChatState {
    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

/// Conversation with the health assistant.
pub struct ChatStore {
    service: ChatService,
    state: Mutex<ChatState>,
}

impl ChatStore {
    pub fn new(service: ChatService) -> Self {
        Self {
            service,
            state: Mutex::new(ChatState::default()),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.state).messages.clone()
    }

    pub fn session_id(&self) -> Option<String> {
        lock(&self.state).session_id.clone()
    }

    pub fn loading(&self) -> bool {
        lock(&self.state).status().loading()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).status().error().map(String::from)
    }

    /// Open a new session. The transcript starts empty.
    pub async fn start_session(&self) -> Result<ChatSession, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.start().await {
            Ok(session) => {
                info!(session_id = %session.session_id, "Chat session started");
                let mut state = lock(&self.state);
                state.session_id = Some(session.session_id.clone());
                state.messages.clear();
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "Failed to start chat");
                lock(&self.state)
                    .status
                    .fail(e.user_message("Failed to start chat"));
                Err(e)
            }
        }
    }

    /// Send `message`, starting a session first if none is open. The user's
    /// message is shown immediately; a failed send appends an error reply.
    pub async fn send_message(&self, message: &str) -> Result<ChatReply, ApiError> {
        let session_id = match self.session_id() {
            Some(id) => id,
            None => self.start_session().await?.session_id,
        };

        lock(&self.state).push(Sender::User, message.to_string());
        let _scope = ActionScope::begin(&self.state);

        match self.service.send(&session_id, message).await {
            Ok(reply) => {
                debug!(%session_id, "Chat reply received");
                let mut state = lock(&self.state);
                let bot = state.push(Sender::Bot, reply.response.clone());
                if let Some(timestamp) = reply.timestamp {
                    bot.timestamp = timestamp;
                }
                bot.metadata = reply.metadata.clone();
                Ok(reply)
            }
            Err(e) => {
                warn!(%session_id, error = %e, "Failed to send chat message");
                let mut state = lock(&self.state);
                state.status.fail(e.user_message("Failed to send message"));
                state.push(Sender::Bot, ERROR_REPLY.to_string()).is_error = true;
                Err(e)
            }
        }
    }

    /// Close the session on the server. Local state is cleared even when the
    /// call fails.
    pub async fn end_session(&self) {
        let Some(session_id) = self.session_id() else {
            return;
        };

        if let Err(e) = self.service.end(&session_id).await {
            warn!(%session_id, error = %e, "Failed to end chat session");
        }

        let mut state = lock(&self.state);
        state.session_id = None;
        state.messages.clear();
    }

    pub fn clear_messages(&self) {
        lock(&self.state).messages.clear();
    }
}
