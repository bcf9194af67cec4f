//! Chat state types

use crate::catalog::ModuleId;
use crate::conversation::{Conversation, ConversationId};
use serde::{Deserialize, Serialize};

/// Submission state of one conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatState {
    /// Ready for learner input
    #[default]
    Idle,

    /// Learner message appended, tutor round trip in flight
    Sending,
}

impl ChatState {
    /// Check if the tutor is currently working on a reply
    #[must_use]
    pub fn is_working(&self) -> bool {
        matches!(self, ChatState::Sending)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ChatState::Idle => "idle",
            ChatState::Sending => "sending",
        }
    }
}

/// Snapshot of the target conversation taken when an event is handled.
///
/// Built at submission time, so a reply is applied to the thread it was
/// sent from even if the learner has switched threads since.
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub conversation_id: ConversationId,
    pub module_id: ModuleId,
    pub remote_conversation_id: Option<String>,
    /// Whether the thread still carries the placeholder title
    pub has_default_title: bool,
}

impl ChatContext {
    #[must_use]
    pub fn new(conversation_id: ConversationId, module_id: ModuleId) -> Self {
        Self {
            conversation_id,
            module_id,
            remote_conversation_id: None,
            has_default_title: false,
        }
    }

    #[must_use]
    pub fn for_conversation(conversation: &Conversation, module_id: ModuleId) -> Self {
        Self {
            conversation_id: conversation.id(),
            module_id,
            remote_conversation_id: conversation.remote_conversation_id().map(String::from),
            has_default_title: conversation.has_default_title(),
        }
    }
}
