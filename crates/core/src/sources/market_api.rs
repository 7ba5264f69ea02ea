use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::providers::traits::QuoteProvider;

use super::traits::AssetSource;

/// Default holdings synthesized when no backend is reachable: (symbol, quantity, asset type).
pub const DEFAULT_HOLDINGS: &[(&str, f64, &str)] = &[
    ("AAPL", 10.0, "Stock"),
    ("MSFT", 8.0, "Stock"),
    ("GOOGL", 5.0, "Stock"),
    ("AMZN", 4.0, "Stock"),
    ("SPY", 6.0, "ETF"),
    ("BND", 12.0, "Bond"),
];

/// Builds a demo holding list from an external market-data API.
///
/// Each default symbol is looked up for its company name. A failed lookup
/// degrades that entry to its ticker; the source only fails when every
/// lookup fails, which means the API itself is unreachable.
pub struct MarketApiSource {
    provider: Arc<dyn QuoteProvider>,
    holdings: Vec<(String, f64, String)>,
}

impl MarketApiSource {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            holdings: DEFAULT_HOLDINGS
                .iter()
                .map(|(s, q, t)| (s.to_string(), *q, t.to_string()))
                .collect(),
        }
    }

    /// Replace the default symbol list.
    pub fn with_holdings(mut self, holdings: Vec<(String, f64, String)>) -> Self {
        self.holdings = holdings;
        self
    }
}

#[async_trait]
impl AssetSource for MarketApiSource {
    fn name(&self) -> &str {
        "Market API"
    }

    fn is_available(&self) -> bool {
        !self.holdings.is_empty()
    }

    async fn fetch_assets(&self) -> Result<Vec<Asset>, CoreError> {
        let mut assets = Vec::with_capacity(self.holdings.len());
        let mut resolved = 0usize;
        let mut last_error = None;

        for (symbol, quantity, asset_type) in &self.holdings {
            let name = match self.provider.get_company_name(symbol).await {
                Ok(name) => {
                    resolved += 1;
                    name
                }
                Err(e) => {
                    warn!("Company lookup for {symbol} via {} failed: {e}", self.provider.name());
                    last_error = Some(e);
                    symbol.clone()
                }
            };
            assets.push(Asset::new(symbol.as_str(), name, *quantity, asset_type.as_str()));
        }

        if resolved == 0 {
            if let Some(e) = last_error {
                return Err(e);
            }
        }
        debug!(
            "Synthesized {} holdings from {} ({resolved} names resolved)",
            assets.len(),
            self.provider.name()
        );
        Ok(assets)
    }
}
