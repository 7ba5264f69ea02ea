use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::Asset;

/// A place the holding list can come from.
///
/// Sources are tried in registry order; each one decides for itself whether
/// it can currently serve requests.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Whether this source can be used right now.
    fn is_available(&self) -> bool;

    /// Fetch the full holding list.
    async fn fetch_assets(&self) -> Result<Vec<Asset>, CoreError>;

    /// Whether [`AssetSource::add_asset`] is supported.
    fn supports_write(&self) -> bool {
        false
    }

    /// Persist a new asset and return the stored version.
    async fn add_asset(&self, asset: &Asset) -> Result<Asset, CoreError> {
        Err(CoreError::ValidationError(format!(
            "{} does not accept new assets (tried to add {})",
            self.name(),
            asset.symbol
        )))
    }
}
