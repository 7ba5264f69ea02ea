use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::MarketQuote;

/// Trait abstraction for all market-data providers.
///
/// Each data source (Yahoo Finance, Alpha Vantage, synthetic) implements
/// this trait. If an API stops working or changes, only that one
/// implementation is replaced.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Current price and previous close for a ticker symbol.
    async fn get_quote(&self, symbol: &str) -> Result<MarketQuote, CoreError>;

    /// Company / instrument display name for a ticker symbol.
    async fn get_company_name(&self, symbol: &str) -> Result<String, CoreError>;
}
