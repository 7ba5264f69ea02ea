use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::errors::CoreError;
use crate::gateway::client::BackendGateway;
use crate::models::asset::Asset;

use super::traits::AssetSource;

/// Shared slot holding the backend gateway once initialization succeeded.
///
/// Cloning shares the slot, so every holder sees attach/detach immediately.
#[derive(Clone, Default)]
pub struct BackendHandle {
    slot: Arc<RwLock<Option<BackendGateway>>>,
}

impl BackendHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, gateway: BackendGateway) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(gateway);
        }
    }

    pub fn detach(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }

    pub fn gateway(&self) -> Option<BackendGateway> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }

    pub fn is_attached(&self) -> bool {
        self.slot.read().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

/// The backend's `/api/assets` endpoints.
pub struct BackendSource {
    handle: BackendHandle,
}

impl BackendSource {
    pub fn new(handle: BackendHandle) -> Self {
        Self { handle }
    }

    fn gateway(&self) -> Result<BackendGateway, CoreError> {
        self.handle.gateway().ok_or(CoreError::NotReady)
    }
}

#[async_trait]
impl AssetSource for BackendSource {
    fn name(&self) -> &str {
        "Backend"
    }

    fn is_available(&self) -> bool {
        self.handle.is_attached()
    }

    async fn fetch_assets(&self) -> Result<Vec<Asset>, CoreError> {
        self.gateway()?.list_assets().await
    }

    fn supports_write(&self) -> bool {
        true
    }

    async fn add_asset(&self, asset: &Asset) -> Result<Asset, CoreError> {
        self.gateway()?.create_asset(asset).await
    }
}
