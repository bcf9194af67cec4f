//! Wire types for the tutor chat endpoint

use crate::catalog::ModuleId;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of a chat request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub module_id: &'a ModuleId,
    pub message: &'a str,
    pub conversation_id: Option<&'a str>,
}

/// Tutor reply. Every field is optional; a reply with no text is valid and
/// gets the generic Socratic prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorReply {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub conversation_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub message_id: Option<String>,
}

impl TutorReply {
    #[must_use]
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }
}

/// Servers send ids either as JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}
