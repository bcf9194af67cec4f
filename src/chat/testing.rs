//! Mock implementations for testing
//!
//! These mocks enable controller and catalog tests without real I/O.

use crate::catalog::{CatalogError, ModuleCatalog, ModuleId, ModuleInfo};
use crate::tutor::{TutorApi, TutorError, TutorReply};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Mock Tutor
// ============================================================================

/// A request as the tutor received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub module_id: ModuleId,
    pub message: String,
    pub conversation_id: Option<String>,
}

/// Mock tutor that returns queued results
pub struct MockTutor {
    responses: Mutex<VecDeque<Result<TutorReply, TutorError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTutor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: TutorReply) {
        self.responses.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: TutorError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    #[must_use]
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, module_id: &ModuleId, message: &str, conversation_id: Option<&str>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            module_id: module_id.clone(),
            message: message.to_string(),
            conversation_id: conversation_id.map(String::from),
        });
    }

    fn next_response(&self) -> Result<TutorReply, TutorError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TutorError::network("No mock response queued")))
    }
}

impl Default for MockTutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TutorApi for MockTutor {
    async fn send_message(
        &self,
        module_id: &ModuleId,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<TutorReply, TutorError> {
        self.record(module_id, message, conversation_id);
        self.next_response()
    }
}

// ============================================================================
// Delayed Mock Tutor (for in-flight testing)
// ============================================================================

/// Mock tutor that holds each request until the test releases it
pub struct DelayedMockTutor {
    inner: MockTutor,
    /// Notified when a request starts
    pub request_started: Arc<Notify>,
    /// Notify to let the pending request complete
    pub release: Arc<Notify>,
}

impl DelayedMockTutor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: MockTutor::new(),
            request_started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, reply: TutorReply) {
        self.inner.queue_reply(reply);
    }

    #[must_use]
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl TutorApi for DelayedMockTutor {
    async fn send_message(
        &self,
        module_id: &ModuleId,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<TutorReply, TutorError> {
        self.inner.record(module_id, message, conversation_id);
        // notify_one keeps a permit, so the test may start waiting late
        self.request_started.notify_one();
        self.release.notified().await;
        self.inner.next_response()
    }
}

// ============================================================================
// Mock Catalog
// ============================================================================

pub struct MockCatalog {
    modules: Option<Vec<ModuleInfo>>,
}

impl MockCatalog {
    #[must_use]
    pub fn with_modules(modules: Vec<ModuleInfo>) -> Self {
        Self {
            modules: Some(modules),
        }
    }

    /// Catalog whose request always fails
    #[must_use]
    pub fn failing() -> Self {
        Self { modules: None }
    }
}

#[async_trait]
impl ModuleCatalog for MockCatalog {
    async fn list(&self) -> Result<Vec<ModuleInfo>, CatalogError> {
        self.modules.clone().ok_or(CatalogError::Status(503))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_tutor() {
        let mock = MockTutor::new();
        mock.queue_reply(TutorReply::text("Hello?"));

        let module_id = ModuleId::from(1);
        let reply = mock.send_message(&module_id, "hi", None).await.unwrap();
        assert_eq!(reply.reply.as_deref(), Some("Hello?"));

        // Second call should fail (no more responses)
        assert!(mock.send_message(&module_id, "hi", None).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_delayed_mock_waits_for_release() {
        let mock = Arc::new(DelayedMockTutor::new());
        mock.queue_reply(TutorReply::text("Later?"));

        let m = Arc::clone(&mock);
        let handle = tokio::spawn(async move {
            m.send_message(&ModuleId::from(1), "hi", None).await
        });

        mock.request_started.notified().await;
        assert!(!handle.is_finished());
        mock.release.notify_one();

        let reply = handle.await.unwrap().unwrap();
        assert_eq!(reply.reply.as_deref(), Some("Later?"));
        assert_eq!(mock.recorded_requests()[0].message, "hi");
    }
}
