use crate::errors::CoreError;
use crate::models::asset::Asset;

use super::store::KeyValueStore;

/// Key under which the asset list is stored.
pub const ASSETS_KEY: &str = "assets";

/// High-level storage operations: load/save the asset list as a JSON array.
pub struct StorageManager;

impl StorageManager {
    /// Load the stored asset list. A missing key is an empty list.
    pub fn load_assets(store: &dyn KeyValueStore) -> Result<Vec<Asset>, CoreError> {
        match store.get(ASSETS_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                CoreError::Deserialization(format!("Failed to decode stored assets: {e}"))
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored asset list.
    pub fn save_assets(store: &dyn KeyValueStore, assets: &[Asset]) -> Result<(), CoreError> {
        let json = serde_json::to_string(assets)
            .map_err(|e| CoreError::Serialization(format!("Failed to encode assets: {e}")))?;
        store.set(ASSETS_KEY, &json)
    }

    /// Append one asset to the stored list and return it.
    pub fn append_asset(store: &dyn KeyValueStore, asset: Asset) -> Result<Asset, CoreError> {
        let mut assets = Self::load_assets(store)?;
        assets.push(asset.clone());
        Self::save_assets(store, &assets)?;
        Ok(asset)
    }
}
