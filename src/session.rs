use crate::ai::{ChatApi, ChatMessage};
use crate::credential::Credential;
use crate::error::StudioError;
use crate::roles::RoleRegistry;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One message in the conversation log.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// An append-only conversation owned by the running app.
///
/// The active role is stored by name and re-resolved through the registry on
/// every send, so switching personas mid-conversation changes the system
/// prompt for subsequent requests without rewriting history. Turns are never
/// mutated or removed; the log lives exactly as long as the session.
pub struct ChatSession {
    turns: Vec<ChatTurn>,
    active_role: String,
}

impl ChatSession {
    pub fn new(role_name: impl Into<String>) -> Self {
        Self {
            turns: Vec::new(),
            active_role: role_name.into(),
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn active_role(&self) -> &str {
        &self.active_role
    }

    pub fn set_active_role(&mut self, name: impl Into<String>) {
        self.active_role = name.into();
    }

    /// Send one user message and record the assistant's reply.
    ///
    /// Issues exactly one chat-completion request: one system message built
    /// from the active role, then the full turn log ending with the new user
    /// message. The user turn is appended before the request goes out; a
    /// provider failure leaves it in the log unanswered, and the next send
    /// includes it as context. Validation failures touch nothing.
    pub async fn send_message(
        &mut self,
        api: &dyn ChatApi,
        credential: &Credential,
        registry: &RoleRegistry,
        model: &str,
        text: &str,
    ) -> Result<(), StudioError> {
        if credential.is_empty() {
            return Err(StudioError::Validation(
                "Please enter your OpenAI API key!".to_string(),
            ));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(StudioError::Validation(
                "Please enter a message to send!".to_string(),
            ));
        }

        let role = registry.lookup(&self.active_role)?;

        self.turns.push(ChatTurn {
            speaker: Speaker::User,
            text: text.to_string(),
        });

        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.push(ChatMessage::system(role.system_prompt));
        for turn in &self.turns {
            messages.push(match turn.speaker {
                Speaker::User => ChatMessage::user(&turn.text),
                Speaker::Assistant => ChatMessage::assistant(&turn.text),
            });
        }

        let reply = api.complete(credential, model, &messages).await?;

        self.turns.push(ChatTurn {
            speaker: Speaker::Assistant,
            text: reply,
        });
        Ok(())
    }
}
