use super::alphavantage::AlphaVantageProvider;
use super::synthetic::SyntheticQuoteProvider;
use super::traits::QuoteProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered registry of market-data providers.
///
/// Earlier registrations take priority; later ones are fallbacks.
/// New providers can be added without modifying existing code.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    ///
    /// Order: Yahoo Finance, Alpha Vantage (only with a key), synthetic.
    pub fn new_with_defaults(alphavantage_key: Option<&str>) -> Self {
        let mut registry = Self::new();

        // Yahoo Finance: no API key needed (primary)
        match YahooFinanceProvider::new() {
            Ok(yahoo) => registry.register(Box::new(yahoo)),
            Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
        }

        // Alpha Vantage: requires API key
        if let Some(key) = alphavantage_key.filter(|k| !k.is_empty()) {
            registry.register(Box::new(AlphaVantageProvider::new(key.to_string())));
        }

        // Synthetic: always last, never fails
        registry.register(Box::new(SyntheticQuoteProvider::new()));

        registry
    }

    /// Register a new provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// All providers in priority order.
    pub fn providers(&self) -> Vec<&dyn QuoteProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
