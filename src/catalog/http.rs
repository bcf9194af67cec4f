//! HTTP module catalog

use super::{CatalogError, ModuleCatalog, ModuleInfo};
use crate::auth::AuthGate;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const MODULES_PATH: &str = "/api/modules";

/// The service answers with either a bare array or `{ "modules": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum ModulesResponse {
    List(Vec<ModuleInfo>),
    Wrapped { modules: Vec<ModuleInfo> },
}

impl ModulesResponse {
    fn into_modules(self) -> Vec<ModuleInfo> {
        match self {
            ModulesResponse::List(modules) | ModulesResponse::Wrapped { modules } => modules,
        }
    }
}

pub struct HttpModuleCatalog {
    client: Client,
    endpoint: String,
    auth: Arc<dyn AuthGate>,
}

impl HttpModuleCatalog {
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
            endpoint: format!("{}{MODULES_PATH}", base_url.trim_end_matches('/')),
            auth,
        })
    }
}

#[async_trait]
impl ModuleCatalog for HttpModuleCatalog {
    async fn list(&self) -> Result<Vec<ModuleInfo>, CatalogError> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = self.auth.bearer_token().await {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.auth.on_unauthorized().await;
                Err(CatalogError::Auth)
            }
            status if !status.is_success() => Err(CatalogError::Status(status.as_u16())),
            _ => Ok(response.json::<ModulesResponse>().await?.into_modules()),
        }
    }
}
