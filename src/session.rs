//! Module session lifecycle
//!
//! Opening a module is an explicit event. The first open seeds the store
//! with one conversation; opening the same module again hands back the
//! existing store untouched.

use crate::catalog::{ModuleId, ModuleInfo};
use crate::conversation::{ConversationStore, SharedStore};
use std::sync::Arc;

/// The currently open module and its conversations
pub struct ModuleSession {
    module: ModuleInfo,
    store: SharedStore,
}

impl ModuleSession {
    fn open(module: ModuleInfo) -> Self {
        let store = ConversationStore::open(module.clone()).into_shared();
        Self { module, store }
    }

    #[must_use]
    pub fn module(&self) -> &ModuleInfo {
        &self.module
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module.id
    }

    #[must_use]
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }
}

/// Tracks which module session is open
#[derive(Default)]
pub struct SessionManager {
    current: Option<ModuleSession>,
}

impl SessionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a module being opened.
    ///
    /// Idempotent for the module that is already open. Opening a different
    /// module ends the previous session and drops its conversations.
    pub fn on_module_opened(&mut self, module: &ModuleInfo) -> &ModuleSession {
        let reuse = self
            .current
            .as_ref()
            .is_some_and(|session| session.module.id == module.id);

        if reuse {
            tracing::debug!(module_id = %module.id, "Module already open, keeping session");
        } else {
            if let Some(previous) = self.current.take() {
                tracing::info!(module_id = %previous.module.id, "Closing module session");
            }
            tracing::info!(module_id = %module.id, title = %module.title, "Opening module session");
        }

        self.current.get_or_insert_with(|| ModuleSession::open(module.clone()))
    }

    /// End the open session, if any
    pub fn on_module_closed(&mut self) -> Option<ModuleInfo> {
        let session = self.current.take()?;
        tracing::info!(module_id = %session.module.id, "Closing module session");
        Some(session.module)
    }

    #[must_use]
    pub fn current(&self) -> Option<&ModuleSession> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_modules;
    use crate::conversation::Message;

    #[tokio::test]
    async fn test_every_module_opens_with_one_welcome_message() {
        let mut sessions = SessionManager::new();
        for module in fallback_modules() {
            let store = sessions.on_module_opened(&module).store();
            let store = store.lock().await;
            assert_eq!(store.len(), 1);
            let messages = store.get_active().messages();
            assert_eq!(messages.len(), 1);
            assert!(messages[0]
                .content()
                .starts_with(&format!("Welcome to {}!", module.title)));
        }
    }

    #[tokio::test]
    async fn test_reopening_same_module_does_not_reseed() {
        let module = ModuleInfo::new("1", "Active Listening", "");
        let mut sessions = SessionManager::new();

        let first = sessions.on_module_opened(&module).store();
        {
            let mut store = first.lock().await;
            let id = store.active_id();
            store.append_message(id, Message::user("hello")).unwrap();
        }

        let second = sessions.on_module_opened(&module).store();
        assert!(Arc::ptr_eq(&first, &second));

        let store = second.lock().await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_active().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_switching_module_starts_fresh_session() {
        let a = ModuleInfo::new("1", "Active Listening", "");
        let b = ModuleInfo::new("2", "Critical Thinking", "");
        let mut sessions = SessionManager::new();

        let store_a = sessions.on_module_opened(&a).store();
        store_a.lock().await.create_conversation();

        let session_b = sessions.on_module_opened(&b);
        assert_eq!(session_b.module_id(), &b.id);
        let store_b = session_b.store();
        assert!(!Arc::ptr_eq(&store_a, &store_b));
        assert_eq!(store_b.lock().await.len(), 1);

        // Coming back to a starts over, since its session ended
        let store_a_again = sessions.on_module_opened(&a).store();
        assert_eq!(store_a_again.lock().await.len(), 1);
    }

    #[test]
    fn test_close() {
        let module = ModuleInfo::new("1", "Active Listening", "");
        let mut sessions = SessionManager::new();
        assert!(sessions.on_module_closed().is_none());

        sessions.on_module_opened(&module);
        assert_eq!(sessions.on_module_closed(), Some(module));
        assert!(sessions.current().is_none());
    }
}
