use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::config::AppConfig;
use crate::errors::CoreError;

use super::transport::{BackendTransport, HttpTransport};

/// Creates a backend transport from configuration.
///
/// Called under the initialization retry policy, so transient failures here
/// are retried before the application is marked as failed.
#[async_trait]
pub trait BackendConnector: Send + Sync {
    async fn connect(&self, config: &AppConfig) -> Result<Arc<dyn BackendTransport>, CoreError>;
}

/// Connector for the production [`HttpTransport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

#[async_trait]
impl BackendConnector for HttpConnector {
    async fn connect(&self, config: &AppConfig) -> Result<Arc<dyn BackendTransport>, CoreError> {
        validate_canister_id(&config.canister_id)?;
        if config.uses_default_canister() {
            warn!("No backend canister id configured, using the placeholder identifier");
        }
        let transport = HttpTransport::new(config)?;
        info!(
            "Backend transport ready for canister {} on {}",
            config.canister_id,
            config.host()
        );
        Ok(Arc::new(transport))
    }
}

/// A canister id is non-empty and made of ASCII alphanumerics, `-` and `_`.
pub fn validate_canister_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::Initialization("Canister id is empty".into()));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CoreError::Initialization(format!(
            "Canister id '{id}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}
