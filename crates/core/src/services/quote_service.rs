use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::quote::MarketQuote;
use crate::providers::registry::QuoteProviderRegistry;

/// Fetches market quotes from the registered providers with automatic fallback.
///
/// Quotes are never cached: every render cycle asks again.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of all registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Fetch one quote.
    ///
    /// Tries providers in registration order. If one fails (API down, rate
    /// limited, shape mismatch) or returns a non-finite/negative price, the
    /// next provider is asked. Returns the last error if all of them fail.
    pub async fn get_quote(&self, symbol: &str) -> Result<MarketQuote, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::Api {
                provider: "none".into(),
                message: format!("No market-data provider registered for {symbol}"),
            });
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_quote(symbol).await {
                Ok(quote) if quote.is_valid() => {
                    debug!("Quote for {symbol} from {}: {quote:?}", provider.name());
                    return Ok(quote);
                }
                Ok(quote) => {
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid quote returned for {symbol}: {quote:?} (prices must be finite and non-negative)"
                        ),
                    });
                }
                Err(e) => {
                    warn!("{} failed for {symbol}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::Api {
            provider: "none".into(),
            message: format!("No quote available for {symbol}"),
        }))
    }

    /// Company name lookup with the same fallback order as [`QuoteService::get_quote`].
    pub async fn get_company_name(&self, symbol: &str) -> Result<String, CoreError> {
        let mut last_error = None;
        for provider in self.registry.providers() {
            match provider.get_company_name(symbol).await {
                Ok(name) => return Ok(name),
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| CoreError::Api {
            provider: "none".into(),
            message: format!("No company name available for {symbol}"),
        }))
    }

    /// Fetch quotes for every distinct symbol, at most `concurrency` at a time.
    ///
    /// Results are keyed by symbol. A symbol whose lookup fails is logged and
    /// left out; the batch itself never fails.
    pub async fn quotes_for<S: AsRef<str>>(
        &self,
        symbols: &[S],
        concurrency: usize,
    ) -> HashMap<String, MarketQuote> {
        let mut seen = HashSet::new();
        let distinct: Vec<&str> = symbols
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| seen.insert(*s))
            .collect();

        let results: Vec<(&str, Result<MarketQuote, CoreError>)> = stream::iter(distinct)
            .map(|symbol| async move { (symbol, self.get_quote(symbol).await) })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut quotes = HashMap::with_capacity(results.len());
        for (symbol, result) in results {
            match result {
                Ok(quote) => {
                    quotes.insert(symbol.to_string(), quote);
                }
                Err(e) => warn!("No market data for {symbol}, showing placeholders: {e}"),
            }
        }
        quotes
    }
}
