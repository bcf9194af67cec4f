//! Effects produced by state transitions

use crate::conversation::Role;

/// Effects to be executed after a state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the target conversation
    AppendMessage { role: Role, content: String },

    /// Remember the server-assigned conversation id
    RecordRemoteConversationId { remote_id: String },

    /// Replace the placeholder title
    RenameConversation { title: String },

    /// Send the learner message to the tutor
    RequestTutor {
        message: String,
        remote_conversation_id: Option<String>,
    },
}

impl Effect {
    #[must_use]
    pub fn append_user(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn append_assistant(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
