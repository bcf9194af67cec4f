//! Chat controller
//!
//! Drives one learner submission through the state machine: optimistic user
//! append, tutor round trip, then reply or Socratic fallback.

mod controller;

#[cfg(test)]
pub mod testing;

pub use controller::ChatController;

use crate::conversation::{ConversationId, StoreError};
use crate::state_machine::TransitionError;
use crate::tutor::TutorErrorKind;
use thiserror::Error;

/// What happened to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing appended
    Ignored,
    /// Tutor answered; the reply was appended
    Replied { conversation_id: ConversationId },
    /// Tutor unreachable; the fallback prompt was appended
    FellBack {
        conversation_id: ConversationId,
        kind: TutorErrorKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Conversation {0} is waiting for the tutor")]
    Busy(ConversationId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
