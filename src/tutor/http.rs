//! HTTP implementation of the tutor API

use super::{ChatRequest, TutorApi, TutorError, TutorReply};
use crate::auth::AuthGate;
use crate::catalog::ModuleId;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

const CHAT_PATH: &str = "/api/chat";

/// Posts learner messages to `{base_url}/api/chat` with a bearer credential
pub struct HttpTutorClient {
    client: Client,
    endpoint: String,
    auth: Arc<dyn AuthGate>,
}

impl HttpTutorClient {
    /// # Errors
    ///
    /// Fails if the reqwest client can't be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        auth: Arc<dyn AuthGate>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{CHAT_PATH}", base_url.trim_end_matches('/')),
            auth,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TutorApi for HttpTutorClient {
    async fn send_message(
        &self,
        module_id: &ModuleId,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<TutorReply, TutorError> {
        let body = ChatRequest {
            module_id,
            message,
            conversation_id,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = self.auth.bearer_token().await {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TutorError::from_transport(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TutorError::network(format!("Failed to read response: {e}")))?;

        if status == StatusCode::UNAUTHORIZED {
            self.auth.on_unauthorized().await;
        }
        if !status.is_success() {
            return Err(TutorError::from_status(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            TutorError::invalid_response(format!("Failed to parse response: {e} - body: {text}"))
        })
    }
}
