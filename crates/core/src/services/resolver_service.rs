use std::sync::Arc;

use log::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::retry::{with_retry, AttemptInfo, CancellationFlag, RetryPolicy, Sleeper};
use crate::sources::registry::AssetSourceRegistry;

/// Holding list together with the source that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssets {
    pub source: String,
    pub assets: Vec<Asset>,
}

/// Resolves the holding list from the ordered source chain.
///
/// Each attempt walks the currently available sources in priority order and
/// stops at the first success. The whole walk runs under the retry policy;
/// once attempts are exhausted the last source error is returned.
pub struct AssetResolver {
    registry: AssetSourceRegistry,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl AssetResolver {
    pub fn new(registry: AssetSourceRegistry, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            registry,
            policy,
            sleeper,
        }
    }

    pub fn registry(&self) -> &AssetSourceRegistry {
        &self.registry
    }

    pub async fn resolve_assets(
        &self,
        cancel: &CancellationFlag,
        progress: &mut (dyn FnMut(AttemptInfo) + Send),
    ) -> Result<ResolvedAssets, CoreError> {
        let resolved = with_retry(&self.policy, self.sleeper.as_ref(), cancel, progress, |_| {
            self.try_sources()
        })
        .await?;
        info!(
            "Resolved {} assets from {}",
            resolved.assets.len(),
            resolved.source
        );
        Ok(resolved)
    }

    /// Write `asset` through the first available writable source (no retry).
    pub async fn add_asset(&self, asset: &Asset) -> Result<Asset, CoreError> {
        let source = self.registry.writable().ok_or(CoreError::NoSource)?;
        debug!("Adding {} through {}", asset.symbol, source.name());
        let created = source.add_asset(asset).await?;
        Ok(normalize(created))
    }

    async fn try_sources(&self) -> Result<ResolvedAssets, CoreError> {
        let available = self.registry.available();
        if available.is_empty() {
            return Err(CoreError::NoSource);
        }

        let mut last_error = None;
        for source in available {
            match source.fetch_assets().await {
                Ok(assets) => {
                    return Ok(ResolvedAssets {
                        source: source.name().to_string(),
                        assets: sanitize(assets, source.name()),
                    })
                }
                Err(e) => {
                    warn!("Asset source {} failed: {e}", source.name());
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or(CoreError::NoSource))
    }
}

fn normalize(mut asset: Asset) -> Asset {
    asset.symbol = asset.symbol.trim().to_uppercase();
    asset
}

/// Uppercase symbols and drop entries that break the numeric invariants.
fn sanitize(assets: Vec<Asset>, source: &str) -> Vec<Asset> {
    assets
        .into_iter()
        .map(normalize)
        .filter(|asset| match asset.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping invalid asset from {source}: {e}");
                false
            }
        })
        .collect()
}
