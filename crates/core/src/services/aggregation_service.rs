use std::collections::HashMap;

use crate::models::asset::Asset;
use crate::models::quote::MarketQuote;
use crate::models::snapshot::{
    Allocation, HoldingRow, PerformancePoint, PortfolioSnapshot, ReferenceBasis,
};

/// Turns raw assets plus market quotes into the figures the UI renders:
/// market value, gain/loss, allocation by asset type.
///
/// Pure computation, no I/O. Easy to test.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Build a snapshot for `assets` using `quotes` keyed by symbol.
    ///
    /// Assets without a quote are kept as placeholder rows (zero price and
    /// value, `quote_available = false`) so the table still lists them.
    pub fn aggregate(
        &self,
        assets: &[Asset],
        quotes: &HashMap<String, MarketQuote>,
        basis: ReferenceBasis,
    ) -> PortfolioSnapshot {
        let mut holdings = Vec::with_capacity(assets.len());
        let mut allocation = Allocation::default();
        let mut performance = Vec::with_capacity(assets.len());
        let mut total_value = 0.0;
        let mut total_gain = 0.0;

        for asset in assets {
            let row = match quotes.get(&asset.symbol) {
                Some(quote) => Self::holding_row(asset, quote, basis),
                None => Self::placeholder_row(asset, basis),
            };

            allocation.add(&asset.asset_type, row.market_value);
            performance.push(PerformancePoint {
                symbol: row.symbol.clone(),
                performance: row.gain_value,
            });
            total_value += row.market_value;
            total_gain += row.gain_value;
            holdings.push(row);
        }

        PortfolioSnapshot {
            as_of: chrono::Utc::now(),
            basis,
            holdings,
            allocation,
            performance,
            total_value,
            total_gain,
        }
    }

    /// Price the gain is measured against for `asset` under `basis`.
    pub fn reference_price(asset: &Asset, quote: &MarketQuote, basis: ReferenceBasis) -> f64 {
        match basis {
            ReferenceBasis::PreviousClose => quote.previous_close,
            ReferenceBasis::PurchasePrice => asset.purchase_price.unwrap_or(quote.previous_close),
        }
    }

    fn holding_row(asset: &Asset, quote: &MarketQuote, basis: ReferenceBasis) -> HoldingRow {
        let reference = Self::reference_price(asset, quote, basis);
        let market_value = quote.current_price * asset.quantity;
        let gain_value = market_value - reference * asset.quantity;
        let gain_percent = if asset.quantity > 0.0 {
            gain_percent(quote.current_price, reference)
        } else {
            0.0
        };

        HoldingRow {
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            quantity: asset.quantity,
            asset_type: asset.asset_type.clone(),
            market_price: quote.current_price,
            market_value,
            reference_price: reference,
            gain_value,
            gain_percent,
            quote_available: true,
        }
    }

    fn placeholder_row(asset: &Asset, basis: ReferenceBasis) -> HoldingRow {
        let reference_price = match basis {
            ReferenceBasis::PreviousClose => 0.0,
            ReferenceBasis::PurchasePrice => asset.purchase_price.unwrap_or(0.0),
        };
        HoldingRow {
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            quantity: asset.quantity,
            asset_type: asset.asset_type.clone(),
            market_price: 0.0,
            market_value: 0.0,
            reference_price,
            gain_value: 0.0,
            gain_percent: 0.0,
            quote_available: false,
        }
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}

/// `(current − reference) / reference × 100`, or 0 when the reference is not
/// a positive finite number.
pub fn gain_percent(current: f64, reference: f64) -> f64 {
    if !(reference.is_finite() && reference > 0.0) || !current.is_finite() {
        return 0.0;
    }
    (current - reference) / reference * 100.0
}
