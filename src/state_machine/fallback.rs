//! Socratic replies used when the tutor gives us nothing to show

use crate::tutor::TutorReply;

/// Shown when a reply arrives without any text
pub const GENERIC_PROMPT: &str = "What do you think about this topic? \
    Try putting your current understanding into your own words, and we can examine it together.";

/// Shown when the tutor can't be reached. Never includes the transport error.
pub const UNREACHABLE_PROMPT: &str = "That's a thoughtful question. \
    Before we go further, what do you already know about it, and what made you curious to ask?";

pub const SOCRATIC_FALLBACKS: &[&str] = &[GENERIC_PROMPT, UNREACHABLE_PROMPT];

#[must_use]
pub fn is_socratic_fallback(content: &str) -> bool {
    SOCRATIC_FALLBACKS.contains(&content)
}

/// Pick the text to display for a tutor reply: `reply`, then `message`, then
/// the generic prompt. Blank strings count as missing.
#[must_use]
pub fn reply_content(reply: &TutorReply) -> String {
    [reply.reply.as_deref(), reply.message.as_deref()]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
        .unwrap_or(GENERIC_PROMPT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_field_wins() {
        let reply = TutorReply {
            reply: Some("Why?".to_string()),
            message: Some("Ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(reply_content(&reply), "Why?");
    }

    #[test]
    fn test_message_field_used_when_reply_missing() {
        let reply = TutorReply {
            message: Some("How so?".to_string()),
            ..Default::default()
        };
        assert_eq!(reply_content(&reply), "How so?");
    }

    #[test]
    fn test_blank_fields_fall_back_to_generic_prompt() {
        let reply = TutorReply {
            reply: Some("   ".to_string()),
            message: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(reply_content(&reply), GENERIC_PROMPT);
        assert_eq!(reply_content(&TutorReply::default()), GENERIC_PROMPT);
    }

    #[test]
    fn test_fallbacks_are_reflective_questions() {
        for prompt in SOCRATIC_FALLBACKS {
            assert!(!prompt.is_empty());
            assert!(prompt.contains('?'));
            assert!(is_socratic_fallback(prompt));
        }
        assert!(!is_socratic_fallback("connection refused"));
    }
}
