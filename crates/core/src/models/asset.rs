use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// A tracked position as exchanged with the backend and the local store.
///
/// Field names follow the backend's JSON contract (`assetType`, `purchasePrice`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Ticker symbol, uppercased (e.g., "AAPL", "BTC")
    pub symbol: String,

    /// Human-readable name (e.g., "Apple Inc.")
    pub name: String,

    /// Number of units held (never negative)
    pub quantity: f64,

    /// Free-form category label used for allocation grouping (e.g., "Equity", "Bond")
    pub asset_type: String,

    /// Cost basis per unit, when the holding was entered with one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
}

impl Asset {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        quantity: f64,
        asset_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into(),
            quantity,
            asset_type: asset_type.into(),
            purchase_price: None,
        }
    }

    /// Attach a per-unit purchase price.
    pub fn with_purchase_price(mut self, price: f64) -> Self {
        self.purchase_price = Some(price);
        self
    }

    /// Check the numeric invariants: quantity and purchase price finite and non-negative,
    /// symbol and category non-empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.symbol.is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }
        if self.asset_type.trim().is_empty() {
            return Err(CoreError::ValidationError(format!(
                "Asset type for {} must not be empty",
                self.symbol
            )));
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Quantity for {} must be a non-negative number, got {}",
                self.symbol, self.quantity
            )));
        }
        if let Some(price) = self.purchase_price {
            if !price.is_finite() || price < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Purchase price for {} must be a non-negative number, got {price}",
                    self.symbol
                )));
            }
        }
        Ok(())
    }
}

/// Raw "add asset" form input, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAsset {
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub asset_type: String,
    pub purchase_price: Option<f64>,
}

impl NewAsset {
    /// Normalize and validate into an [`Asset`].
    ///
    /// The symbol is trimmed and uppercased; an empty name falls back to the symbol.
    pub fn into_asset(self) -> Result<Asset, CoreError> {
        let symbol = self.symbol.trim().to_uppercase();
        let name = match self.name.trim() {
            "" => symbol.clone(),
            n => n.to_string(),
        };
        let asset = Asset {
            symbol,
            name,
            quantity: self.quantity,
            asset_type: self.asset_type.trim().to_string(),
            purchase_price: self.purchase_price,
        };
        asset.validate()?;
        Ok(asset)
    }
}

/// One entry in the client-side holding list.
///
/// The same symbol may appear in several entries (e.g., separate lots),
/// so entries are identified by a generated id rather than by symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedAsset {
    pub id: Uuid,
    pub asset: Asset,
}

impl TrackedAsset {
    pub fn new(asset: Asset) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset,
        }
    }
}
