//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::fallback::SOCRATIC_FALLBACKS;
use super::*;
use crate::catalog::ModuleId;
use crate::conversation::{ConversationId, Role};
use crate::tutor::{TutorErrorKind, TutorReply};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ChatContext {
    ChatContext::new(ConversationId::new(1), ModuleId::from("1"))
}

fn assistant_appends(effects: &[Effect]) -> Vec<&str> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::AppendMessage {
                role: Role::Assistant,
                content,
            } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ \t\n]{0,5}",
        "[ ]{0,3}[a-zA-Z?!.,' ]{1,60}[ \n]{0,3}",
    ]
}

fn arb_optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![Just(String::new()), "[a-zA-Z ?]{1,40}"])
}

fn arb_reply() -> impl Strategy<Value = TutorReply> {
    (
        arb_optional_text(),
        arb_optional_text(),
        prop::option::of("[a-z0-9]{1,12}"),
    )
        .prop_map(|(reply, message, conversation_id)| TutorReply {
            reply,
            message,
            conversation_id,
            message_id: None,
        })
}

fn arb_error_kind() -> impl Strategy<Value = TutorErrorKind> {
    prop_oneof![
        Just(TutorErrorKind::Network),
        Just(TutorErrorKind::Timeout),
        Just(TutorErrorKind::Auth),
        Just(TutorErrorKind::RateLimit),
        Just(TutorErrorKind::ServerError),
        Just(TutorErrorKind::InvalidRequest),
        Just(TutorErrorKind::InvalidResponse),
        Just(TutorErrorKind::Unknown),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Blank input never leaves Idle; anything else appends exactly the
    /// trimmed text first and requests the tutor last
    #[test]
    fn prop_submit_from_idle(text in arb_text(), default_title in any::<bool>()) {
        let mut context = test_context();
        context.has_default_title = default_title;
        let result = transition(&ChatState::Idle, &context, Event::Submit { text: text.clone() }).unwrap();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            prop_assert_eq!(result.new_state, ChatState::Idle);
            prop_assert!(result.effects.is_empty());
        } else {
            prop_assert_eq!(result.new_state, ChatState::Sending);
            prop_assert_eq!(&result.effects[0], &Effect::append_user(trimmed));
            let is_request = matches!(
                result.effects.last(),
                Some(Effect::RequestTutor { message, .. }) if message == trimmed
            );
            prop_assert!(is_request);
            prop_assert!(assistant_appends(&result.effects).is_empty());
        }
    }

    /// Sending never accepts another submission
    #[test]
    fn prop_sending_rejects_submit(text in arb_text()) {
        let result = transition(&ChatState::Sending, &test_context(), Event::Submit { text });
        prop_assert_eq!(result.unwrap_err(), TransitionError::Busy);
    }

    /// Every reply yields exactly one non-empty assistant message and Idle
    #[test]
    fn prop_reply_appends_one_assistant_message(
        reply in arb_reply(),
        known_remote in prop::option::of("[a-z]{4}"),
    ) {
        let mut context = test_context();
        context.remote_conversation_id = known_remote.clone();
        let result = transition(&ChatState::Sending, &context, Event::TutorReplied { reply: reply.clone() }).unwrap();

        prop_assert_eq!(result.new_state, ChatState::Idle);
        let appended = assistant_appends(&result.effects);
        prop_assert_eq!(appended.len(), 1);
        prop_assert!(!appended[0].trim().is_empty());

        let records_remote = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::RecordRemoteConversationId { .. }));
        let expect_record = known_remote.is_none()
            && reply.conversation_id.as_deref().is_some_and(|id| !id.is_empty());
        prop_assert_eq!(records_remote, expect_record);
    }

    /// Failures never leak the error text and always use a fixed prompt
    #[test]
    fn prop_failure_is_deterministic(message in "[a-zA-Z :]{1,40}", kind in arb_error_kind()) {
        let event = Event::TutorFailed { message: message.clone(), kind };
        let first = transition(&ChatState::Sending, &test_context(), event.clone()).unwrap();
        let second = transition(&ChatState::Sending, &test_context(), event).unwrap();

        prop_assert_eq!(&first.effects, &second.effects);
        prop_assert_eq!(first.new_state, ChatState::Idle);
        let appended = assistant_appends(&first.effects);
        prop_assert_eq!(appended.len(), 1);
        prop_assert!(SOCRATIC_FALLBACKS.contains(&appended[0]));
    }
}
