use async_trait::async_trait;
use rand::Rng;

use crate::errors::CoreError;
use crate::models::quote::MarketQuote;
use super::traits::QuoteProvider;

/// Upper bound (exclusive) of generated prices.
pub const SYNTHETIC_PRICE_CEILING: f64 = 1000.0;

/// Last-resort provider producing random prices in `[0, 1000)`.
///
/// Always succeeds, so the holdings table and charts still render when
/// every real market-data API is down or rate limited.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticQuoteProvider;

impl SyntheticQuoteProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuoteProvider for SyntheticQuoteProvider {
    fn name(&self) -> &str {
        "Synthetic"
    }

    async fn get_quote(&self, _symbol: &str) -> Result<MarketQuote, CoreError> {
        let mut rng = rand::thread_rng();
        Ok(MarketQuote::new(
            rng.gen_range(0.0..SYNTHETIC_PRICE_CEILING),
            rng.gen_range(0.0..SYNTHETIC_PRICE_CEILING),
        ))
    }

    async fn get_company_name(&self, symbol: &str) -> Result<String, CoreError> {
        Ok(symbol.to_uppercase())
    }
}
