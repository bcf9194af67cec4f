//! Events that can occur in a conversation

use crate::tutor::{TutorErrorKind, TutorReply};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Learner events
    Submit {
        text: String,
    },

    // Tutor events
    TutorReplied {
        reply: TutorReply,
    },
    TutorFailed {
        message: String,
        kind: TutorErrorKind,
    },
}
