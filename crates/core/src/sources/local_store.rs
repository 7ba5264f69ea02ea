use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::storage::manager::StorageManager;
use crate::storage::store::KeyValueStore;

use super::backend::BackendHandle;
use super::traits::AssetSource;

/// Asset list kept in a local key/value store under the `assets` key.
///
/// When tied to a [`BackendHandle`] the store only serves requests while no
/// backend is attached. When given a seed source, an empty store is filled
/// from that source on the first read, so reads and appends always see the
/// same list.
pub struct LocalStoreSource {
    store: Arc<dyn KeyValueStore>,
    backend: Option<BackendHandle>,
    seed: Option<Arc<dyn AssetSource>>,
}

impl LocalStoreSource {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            backend: None,
            seed: None,
        }
    }

    /// Only serve requests while `backend` has no gateway attached.
    pub fn unless_backend(mut self, backend: BackendHandle) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Populate an empty store from `seed` the first time it is read.
    pub fn seeded_from(mut self, seed: Arc<dyn AssetSource>) -> Self {
        self.seed = Some(seed);
        self
    }

    async fn seed_store(&self, seed: &dyn AssetSource) -> Result<Vec<Asset>, CoreError> {
        match seed.fetch_assets().await {
            Ok(assets) => {
                StorageManager::save_assets(self.store.as_ref(), &assets)?;
                info!("Seeded local store with {} assets from {}", assets.len(), seed.name());
                Ok(assets)
            }
            Err(e) => {
                warn!("Could not seed local store from {}: {e}", seed.name());
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl AssetSource for LocalStoreSource {
    fn name(&self) -> &str {
        "Local store"
    }

    fn is_available(&self) -> bool {
        self.backend.as_ref().map_or(true, |b| !b.is_attached())
    }

    async fn fetch_assets(&self) -> Result<Vec<Asset>, CoreError> {
        let stored = StorageManager::load_assets(self.store.as_ref())?;
        if !stored.is_empty() {
            return Ok(stored);
        }
        match self.seed.as_deref() {
            Some(seed) if seed.is_available() => self.seed_store(seed).await,
            _ => Ok(stored),
        }
    }

    fn supports_write(&self) -> bool {
        true
    }

    async fn add_asset(&self, asset: &Asset) -> Result<Asset, CoreError> {
        StorageManager::append_asset(self.store.as_ref(), asset.clone())
    }
}
