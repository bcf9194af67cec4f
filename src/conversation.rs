//! Conversation threads for an open module
//!
//! A module session owns one [`ConversationStore`]; each thread inside it is a
//! [`Conversation`] seeded with a tutor welcome message.

mod message;
mod store;

#[cfg(test)]
mod proptests;

pub use message::{Message, Role};
pub use store::{ConversationStore, ConversationSummary, SharedStore, StoreError, StoreEvent};

use crate::catalog::ModuleInfo;
use crate::state_machine::ChatState;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title given to threads the learner starts explicitly
pub const DEFAULT_TITLE: &str = "New Conversation";

const MAX_DERIVED_TITLE_LENGTH: usize = 40;

/// Identifier of a conversation within one module session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(u64);

impl ConversationId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An ordered, append-only thread of messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    title: String,
    messages: Vec<Message>,
    state: ChatState,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    remote_conversation_id: Option<String>,
}

impl Conversation {
    /// Create a thread holding only the welcome message for `module`
    pub(crate) fn seeded(id: ConversationId, title: impl Into<String>, module: &ModuleInfo) -> Self {
        let welcome = Message::assistant(welcome_message(module.display_name()));
        let now = welcome.created_at();
        Self {
            id,
            title: title.into(),
            messages: vec![welcome],
            state: ChatState::Idle,
            created_at: now,
            last_activity: now,
            remote_conversation_id: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> ConversationId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    #[must_use]
    pub fn remote_conversation_id(&self) -> Option<&str> {
        self.remote_conversation_id.as_deref()
    }

    #[must_use]
    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    /// Advance `last_activity`, bumping by a microsecond when the clock hasn't moved
    fn touch(&mut self) {
        let now = Utc::now();
        self.last_activity = if now > self.last_activity {
            now
        } else {
            self.last_activity + Duration::microseconds(1)
        };
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_state(&mut self, state: ChatState) {
        self.state = state;
    }

    /// Returns false if an id was already recorded
    pub(crate) fn set_remote_conversation_id(&mut self, remote: String) -> bool {
        if self.remote_conversation_id.is_some() {
            return false;
        }
        self.remote_conversation_id = Some(remote);
        true
    }
}

/// Tutor greeting that opens every thread
#[must_use]
pub fn welcome_message(module_title: &str) -> String {
    format!(
        "Welcome to {module_title}! I'm your Socratic tutor. Rather than handing you answers, \
         I'll ask questions that help you reason your way to understanding. \
         What would you like to explore first?"
    )
}

/// Build a short thread title from the learner's first message.
///
/// Collapses whitespace and cuts at a word boundary so the title fits in a
/// sidebar. Returns None for blank input.
#[must_use]
pub fn derive_title(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    if collapsed.chars().count() <= MAX_DERIVED_TITLE_LENGTH {
        return Some(collapsed);
    }

    let truncated: String = collapsed.chars().take(MAX_DERIVED_TITLE_LENGTH).collect();
    let cut = match truncated.rfind(' ') {
        Some(idx) if idx > 0 => truncated.get(..idx).unwrap_or(&truncated).to_string(),
        _ => truncated,
    };
    Some(format!("{}...", cut.trim_end()))
}
