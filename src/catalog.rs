//! Module catalog
//!
//! The tutoring service lists its modules over HTTP. When it returns nothing
//! (or can't be reached) the client falls back to a fixed catalog so the
//! learner can still pick a topic.

mod fallback;
mod http;

pub use fallback::fallback_modules;
pub use http::HttpModuleCatalog;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Module identifier. The service sends numbers or strings; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u32> for ModuleId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for ModuleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

/// A topic the learner can open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl ModuleInfo {
    #[must_use]
    pub fn new(
        id: impl Into<ModuleId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Title for display, falling back to the id for untitled modules
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Catalog request returned HTTP {0}")]
    Status(u16),
    #[error("Catalog request was not authorized")]
    Auth,
}

#[async_trait]
pub trait ModuleCatalog: Send + Sync {
    /// # Errors
    ///
    /// Transport failures, non-success statuses and 401s.
    async fn list(&self) -> Result<Vec<ModuleInfo>, CatalogError>;
}

/// List modules, substituting the fixed catalog when the service has none
pub async fn load_modules(catalog: &dyn ModuleCatalog) -> Vec<ModuleInfo> {
    match catalog.list().await {
        Ok(modules) if !modules.is_empty() => {
            tracing::debug!(count = modules.len(), "Loaded module catalog");
            modules
        }
        Ok(_) => {
            tracing::info!("Module catalog is empty, using built-in modules");
            fallback_modules()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Module catalog unavailable, using built-in modules");
            fallback_modules()
        }
    }
}

/// Find a module by id
#[must_use]
pub fn find_module<'a>(modules: &'a [ModuleInfo], id: &str) -> Option<&'a ModuleInfo> {
    modules.iter().find(|m| m.id.as_str() == id)
}
