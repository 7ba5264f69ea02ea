use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::MarketQuote;
use super::traits::QuoteProvider;

/// Yahoo Finance API provider for stock/equity quotes.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// The quote is built from the last two daily closes of a 5-day window:
/// the latest is the current price, the one before it the previous close.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn get_quote(&self, symbol: &str) -> Result<MarketQuote, CoreError> {
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", "5d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch quotes for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {symbol}: {e}"),
        })?;

        let mut closes = quotes.iter().rev().map(|q| q.close);
        let current = closes.next().ok_or_else(|| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Empty quote series for {symbol}"),
        })?;
        // A freshly listed symbol has a single close; treat it as unchanged.
        let previous = closes.next().unwrap_or(current);

        Ok(MarketQuote::new(current, previous))
    }

    async fn get_company_name(&self, symbol: &str) -> Result<String, CoreError> {
        let result = self
            .connector
            .search_ticker(symbol)
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to search {symbol}: {e}"),
            })?;

        let item = result
            .quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Symbol {symbol} not found"),
            })?;

        let name = if item.long_name.trim().is_empty() {
            item.short_name.trim()
        } else {
            item.long_name.trim()
        };
        if name.is_empty() {
            return Err(CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("No name listed for {symbol}"),
            });
        }
        Ok(name.to_string())
    }
}
