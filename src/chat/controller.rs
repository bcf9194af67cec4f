//! Chat controller executor

use super::{ChatError, SubmitOutcome};
use crate::catalog::ModuleId;
use crate::conversation::{ConversationId, ConversationStore, Message, SharedStore, StoreError};
use crate::state_machine::{
    transition, ChatContext, Effect, Event, TransitionError, TransitionResult,
};
use crate::tutor::{TutorApi, TutorErrorKind};
use std::sync::Arc;

/// Tutor call collected from [`Effect::RequestTutor`], run after the store lock is released
#[derive(Debug)]
struct PendingRequest {
    message: String,
    remote_conversation_id: Option<String>,
}

/// Applies state machine effects to the shared store and the tutor.
///
/// The target conversation is fixed when `submit` starts; a reply is
/// appended there even if the learner switched the active thread while the
/// request was in flight.
pub struct ChatController<T: TutorApi> {
    module_id: ModuleId,
    store: SharedStore,
    tutor: T,
}

impl<T: TutorApi> ChatController<T> {
    #[must_use]
    pub fn new(module_id: ModuleId, store: SharedStore, tutor: T) -> Self {
        Self {
            module_id,
            store,
            tutor,
        }
    }

    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    /// Submit learner text to the active conversation
    ///
    /// Dropping the returned future while the tutor call is pending (for
    /// example under `tokio::time::timeout`) settles the conversation with the
    /// Socratic fallback, so it does not stay busy.
    ///
    /// # Errors
    ///
    /// `ChatError::Busy` if that conversation is still waiting for the tutor.
    /// A tutor failure is not an error; it yields `SubmitOutcome::FellBack`.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, ChatError> {
        let (conversation_id, request) = {
            let mut store = self.store.lock().await;
            let conversation_id = store.active_id();
            let request = dispatch(
                &mut store,
                &self.module_id,
                conversation_id,
                Event::Submit {
                    text: text.to_string(),
                },
            )?;
            (conversation_id, request)
        };

        let Some(request) = request else {
            return Ok(SubmitOutcome::Ignored);
        };

        let in_flight = InFlight {
            store: Arc::clone(&self.store),
            module_id: self.module_id.clone(),
            conversation_id,
            armed: true,
        };

        tracing::info!(
            conv_id = %conversation_id,
            module_id = %self.module_id,
            "Sending message to tutor"
        );

        let result = self
            .tutor
            .send_message(
                &self.module_id,
                &request.message,
                request.remote_conversation_id.as_deref(),
            )
            .await;

        let (event, outcome) = match result {
            Ok(reply) => (
                Event::TutorReplied { reply },
                SubmitOutcome::Replied { conversation_id },
            ),
            Err(e) => {
                tracing::warn!(
                    conv_id = %conversation_id,
                    kind = ?e.kind,
                    error = %e,
                    "Tutor unreachable, using Socratic fallback"
                );
                (
                    Event::TutorFailed {
                        message: e.message,
                        kind: e.kind,
                    },
                    SubmitOutcome::FellBack {
                        conversation_id,
                        kind: e.kind,
                    },
                )
            }
        };

        let mut store = self.store.lock().await;
        let applied = dispatch(&mut store, &self.module_id, conversation_id, event);
        in_flight.disarm();
        applied?;
        Ok(outcome)
    }
}

/// Run one event through the state machine for `conversation_id`
fn dispatch(
    store: &mut ConversationStore,
    module_id: &ModuleId,
    conversation_id: ConversationId,
    event: Event,
) -> Result<Option<PendingRequest>, ChatError> {
    let conversation = store.get(conversation_id)?;
    let context = ChatContext::for_conversation(conversation, module_id.clone());
    let state = conversation.state().clone();

    let result = transition(&state, &context, event).map_err(|e| match e {
        TransitionError::Busy => ChatError::Busy(conversation_id),
        other => ChatError::Transition(other),
    })?;

    Ok(apply_effects(store, conversation_id, result)?)
}

/// Armed while a tutor call is pending. If `submit` is dropped before the
/// outcome is applied, the target conversation is failed back to `Idle`.
struct InFlight {
    store: SharedStore,
    module_id: ModuleId,
    conversation_id: ConversationId,
    armed: bool,
}

impl InFlight {
    fn disarm(mut self) {
        self.armed = false;
    }

    fn cancelled() -> Event {
        Event::TutorFailed {
            message: "Submission cancelled before the tutor replied".to_string(),
            kind: TutorErrorKind::Unknown,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(conv_id = %self.conversation_id, "Submission dropped while waiting for the tutor");

        if let Ok(mut store) = self.store.try_lock() {
            if let Err(e) = dispatch(&mut store, &self.module_id, self.conversation_id, Self::cancelled()) {
                tracing::warn!(conv_id = %self.conversation_id, error = %e, "Failed to settle cancelled submission");
            }
            return;
        }

        // Store is busy elsewhere; settle once it frees up
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let module_id = self.module_id.clone();
        let conversation_id = self.conversation_id;
        handle.spawn(async move {
            let mut store = store.lock().await;
            if let Err(e) = dispatch(&mut store, &module_id, conversation_id, InFlight::cancelled()) {
                tracing::warn!(conv_id = %conversation_id, error = %e, "Failed to settle cancelled submission");
            }
        });
    }
}

/// Apply effects in order, then persist the new state
fn apply_effects(
    store: &mut ConversationStore,
    conversation_id: ConversationId,
    result: TransitionResult,
) -> Result<Option<PendingRequest>, StoreError> {
    let mut request = None;

    for effect in result.effects {
        match effect {
            Effect::AppendMessage { role, content } => {
                store.append_message(conversation_id, Message::new(role, content))?;
            }
            Effect::RecordRemoteConversationId { remote_id } => {
                store.set_remote_conversation_id(conversation_id, remote_id)?;
            }
            Effect::RenameConversation { title } => {
                store.rename(conversation_id, &title)?;
            }
            Effect::RequestTutor {
                message,
                remote_conversation_id,
            } => {
                request = Some(PendingRequest {
                    message,
                    remote_conversation_id,
                });
            }
        }
    }

    store.update_state(conversation_id, result.new_state)?;
    Ok(request)
}
