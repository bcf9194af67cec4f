//! Remote tutor abstraction
//!
//! The chat controller only sees [`TutorApi`]; the HTTP client and the
//! logging wrapper both implement it.

mod error;
mod http;
mod types;

pub use error::{TutorError, TutorErrorKind};
pub use http::HttpTutorClient;
pub use types::{ChatRequest, TutorReply};

use crate::catalog::ModuleId;
use async_trait::async_trait;
use std::sync::Arc;

/// Remote chat endpoint of the tutoring service
#[async_trait]
pub trait TutorApi: Send + Sync {
    /// Send one learner message. `conversation_id` is the server-assigned id
    /// from an earlier reply, if any.
    ///
    /// # Errors
    ///
    /// Any transport, status or decoding failure, classified by
    /// [`TutorErrorKind`].
    async fn send_message(
        &self,
        module_id: &ModuleId,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<TutorReply, TutorError>;
}

#[async_trait]
impl<T: TutorApi + ?Sized> TutorApi for Arc<T> {
    async fn send_message(
        &self,
        module_id: &ModuleId,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<TutorReply, TutorError> {
        (**self)
            .send_message(module_id, message, conversation_id)
            .await
    }
}

/// Logging wrapper for tutor clients
pub struct LoggingTutor<T> {
    inner: T,
}

impl<T: TutorApi> LoggingTutor<T> {
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: TutorApi> TutorApi for LoggingTutor<T> {
    async fn send_message(
        &self,
        module_id: &ModuleId,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<TutorReply, TutorError> {
        let start = std::time::Instant::now();
        let result = self
            .inner
            .send_message(module_id, message, conversation_id)
            .await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    module_id = %module_id,
                    remote_id = ?reply.conversation_id,
                    duration_ms = %duration.as_millis(),
                    has_text = reply.reply.is_some() || reply.message.is_some(),
                    "Tutor request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    module_id = %module_id,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Tutor request failed"
                );
            }
        }

        result
    }
}
