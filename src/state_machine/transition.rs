//! Pure state transition function
//!
//! Given the same state, context and event it always produces the same
//! result, with no I/O. Message ids and timestamps are assigned by the
//! executor when it applies [`Effect::AppendMessage`].

use super::fallback::{reply_content, UNREACHABLE_PROMPT};
use super::{ChatContext, ChatState, Effect, Event};
use crate::conversation::derive_title;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Tutor is still replying, wait before sending another message")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Compute the next state and the effects to apply.
///
/// # Errors
///
/// `Busy` for a submission while a reply is pending, `InvalidTransition`
/// for a tutor event that arrives while idle.
pub fn transition(
    state: &ChatState,
    context: &ChatContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Learner submission
        // ============================================================

        // Idle + blank Submit -> Idle, nothing happens
        (ChatState::Idle, Event::Submit { text }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(ChatState::Idle))
        }

        // Idle + Submit -> Sending, user message appended before the request
        (ChatState::Idle, Event::Submit { text }) => {
            let text = text.trim().to_string();
            let rename = context
                .has_default_title
                .then(|| derive_title(&text))
                .flatten()
                .map(|title| Effect::RenameConversation { title });

            Ok(TransitionResult::new(ChatState::Sending)
                .with_effect(Effect::append_user(text.clone()))
                .with_effects(rename)
                .with_effect(Effect::RequestTutor {
                    message: text,
                    remote_conversation_id: context.remote_conversation_id.clone(),
                }))
        }

        (ChatState::Sending, Event::Submit { .. }) => Err(TransitionError::Busy),

        // ============================================================
        // Tutor outcome
        // ============================================================

        // Sending + TutorReplied -> Idle
        (ChatState::Sending, Event::TutorReplied { reply }) => {
            let record_remote = match (&context.remote_conversation_id, &reply.conversation_id) {
                (None, Some(remote_id)) if !remote_id.is_empty() => {
                    Some(Effect::RecordRemoteConversationId {
                        remote_id: remote_id.clone(),
                    })
                }
                _ => None,
            };

            Ok(TransitionResult::new(ChatState::Idle)
                .with_effects(record_remote)
                .with_effect(Effect::append_assistant(reply_content(&reply))))
        }

        // Sending + TutorFailed -> Idle with the reflective fallback.
        // No retry: the learner resubmits if they want to.
        (ChatState::Sending, Event::TutorFailed { .. }) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::append_assistant(UNREACHABLE_PROMPT)))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}
