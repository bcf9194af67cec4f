//! Bearer credential supply
//!
//! Token storage lives outside this crate; the core only asks for the current
//! token and reports a 401 so the session can be cleared in one place.

use async_trait::async_trait;
use tokio::sync::RwLock;

#[async_trait]
pub trait AuthGate: Send + Sync {
    /// Current bearer token, if the learner is signed in
    async fn bearer_token(&self) -> Option<String>;

    /// Called on any HTTP 401 from the tutoring service
    async fn on_unauthorized(&self);
}

/// Session status for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    Anonymous,
    /// A token was present and the server rejected it
    Expired,
}

impl AuthStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AuthStatus::Authenticated => "authenticated",
            AuthStatus::Anonymous => "anonymous",
            AuthStatus::Expired => "expired",
        }
    }
}

struct AuthState {
    token: Option<String>,
    status: AuthStatus,
}

/// In-memory token holder, seeded from configuration
pub struct TokenAuthGate {
    state: RwLock<AuthState>,
}

impl TokenAuthGate {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        let status = if token.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        };
        Self {
            state: RwLock::new(AuthState { token, status }),
        }
    }

    pub async fn status(&self) -> AuthStatus {
        self.state.read().await.status
    }

    /// Install a fresh token, e.g. after the learner signs in again
    pub async fn set_token(&self, token: String) {
        let mut state = self.state.write().await;
        state.token = Some(token);
        state.status = AuthStatus::Authenticated;
    }
}

#[async_trait]
impl AuthGate for TokenAuthGate {
    async fn bearer_token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    async fn on_unauthorized(&self) {
        let mut state = self.state.write().await;
        if state.token.take().is_some() {
            state.status = AuthStatus::Expired;
            tracing::warn!("Tutor rejected credentials, session cleared");
        }
    }
}
