//! Per-module conversation store

use super::{Conversation, ConversationId, Message, DEFAULT_TITLE};
use crate::catalog::ModuleInfo;
use crate::state_machine::ChatState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};

const EVENT_CAPACITY: usize = 64;

/// Store handle shared between the session, the controller and observers.
///
/// The lock is never held across a tutor round trip.
pub type SharedStore = Arc<Mutex<ConversationStore>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),
    #[error("Conversation title cannot be empty")]
    EmptyTitle,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Change notifications for observers (the terminal UI, tests)
#[derive(Debug, Clone)]
pub enum StoreEvent {
    ConversationCreated {
        conversation: Conversation,
    },
    MessageAppended {
        conversation_id: ConversationId,
        message: Message,
    },
    ActiveChanged {
        conversation_id: ConversationId,
    },
    StateChanged {
        conversation_id: ConversationId,
        state: ChatState,
    },
    Renamed {
        conversation_id: ConversationId,
        title: String,
    },
}

/// Listing row for a thread picker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub message_count: usize,
    pub last_activity: DateTime<Utc>,
    pub active: bool,
    pub state: ChatState,
}

/// Owns every conversation of one module session.
///
/// Ids are issued from a counter that only moves forward, and there is
/// always exactly one active conversation.
pub struct ConversationStore {
    module: ModuleInfo,
    conversations: BTreeMap<ConversationId, Conversation>,
    active_id: ConversationId,
    next_id: u64,
    events: broadcast::Sender<StoreEvent>,
}

impl ConversationStore {
    /// Open a store for `module`, seeding its first conversation
    #[must_use]
    pub fn open(module: ModuleInfo) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut store = Self {
            module,
            conversations: BTreeMap::new(),
            active_id: ConversationId::new(1),
            next_id: 1,
            events,
        };
        store.create_conversation();
        store
    }

    /// Wrap in the shared handle used by the controller
    #[must_use]
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    #[must_use]
    pub fn module(&self) -> &ModuleInfo {
        &self.module
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Start a new thread and make it active
    pub fn create_conversation(&mut self) -> Conversation {
        let id = ConversationId::new(self.next_id);
        self.next_id += 1;

        let title = if self.conversations.is_empty() {
            self.module.display_name().to_string()
        } else {
            DEFAULT_TITLE.to_string()
        };
        let conversation = Conversation::seeded(id, title, &self.module);
        self.conversations.insert(id, conversation.clone());
        self.active_id = id;

        tracing::debug!(
            module_id = %self.module.id,
            conv_id = %id,
            "Created conversation"
        );
        self.notify(StoreEvent::ConversationCreated {
            conversation: conversation.clone(),
        });
        self.notify(StoreEvent::ActiveChanged { conversation_id: id });

        conversation
    }

    /// # Errors
    ///
    /// `ConversationNotFound` for an id this store never issued.
    pub fn get(&self, id: ConversationId) -> StoreResult<&Conversation> {
        self.conversations
            .get(&id)
            .ok_or(StoreError::ConversationNotFound(id))
    }

    fn get_mut(&mut self, id: ConversationId) -> StoreResult<&mut Conversation> {
        self.conversations
            .get_mut(&id)
            .ok_or(StoreError::ConversationNotFound(id))
    }

    /// Append to the end of a thread and bump its activity timestamp
    ///
    /// # Errors
    ///
    /// `ConversationNotFound` for an unknown id; nothing is appended.
    pub fn append_message(
        &mut self,
        id: ConversationId,
        message: Message,
    ) -> StoreResult<&Conversation> {
        self.get_mut(id)?.push(message.clone());
        self.notify(StoreEvent::MessageAppended {
            conversation_id: id,
            message,
        });
        self.get(id)
    }

    /// # Errors
    ///
    /// `ConversationNotFound` for an unknown id; the active thread is unchanged.
    pub fn set_active(&mut self, id: ConversationId) -> StoreResult<()> {
        self.get(id)?;
        if self.active_id == id {
            return Ok(());
        }
        self.active_id = id;
        self.notify(StoreEvent::ActiveChanged { conversation_id: id });
        Ok(())
    }

    #[must_use]
    pub fn active_id(&self) -> ConversationId {
        self.active_id
    }

    #[must_use]
    pub fn get_active(&self) -> &Conversation {
        // active_id is only ever assigned ids that are present
        &self.conversations[&self.active_id]
    }

    /// # Errors
    ///
    /// `ConversationNotFound` for an unknown id.
    pub fn update_state(&mut self, id: ConversationId, state: ChatState) -> StoreResult<()> {
        let conversation = self.get_mut(id)?;
        if conversation.state() == &state {
            return Ok(());
        }
        conversation.set_state(state.clone());
        self.notify(StoreEvent::StateChanged {
            conversation_id: id,
            state,
        });
        Ok(())
    }

    /// Record the server-side id; ignored once one is known
    ///
    /// # Errors
    ///
    /// `ConversationNotFound` for an unknown id.
    pub fn set_remote_conversation_id(
        &mut self,
        id: ConversationId,
        remote: impl Into<String>,
    ) -> StoreResult<bool> {
        let remote = remote.into();
        let assigned = self.get_mut(id)?.set_remote_conversation_id(remote.clone());
        if assigned {
            tracing::debug!(conv_id = %id, remote_id = %remote, "Captured remote conversation id");
        }
        Ok(assigned)
    }

    /// # Errors
    ///
    /// `EmptyTitle` for a blank title, `ConversationNotFound` for an unknown id.
    pub fn rename(&mut self, id: ConversationId, title: &str) -> StoreResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        self.get_mut(id)?.set_title(title.to_string());
        self.notify(StoreEvent::Renamed {
            conversation_id: id,
            title: title.to_string(),
        });
        Ok(())
    }

    /// Threads in creation order
    pub fn conversations(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    #[must_use]
    pub fn list(&self) -> Vec<ConversationSummary> {
        self.conversations
            .values()
            .map(|c| ConversationSummary {
                id: c.id(),
                title: c.title().to_string(),
                message_count: c.messages().len(),
                last_activity: c.last_activity(),
                active: c.id() == self.active_id,
                state: c.state().clone(),
            })
            .collect()
    }
}
