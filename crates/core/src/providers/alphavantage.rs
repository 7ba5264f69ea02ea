use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::MarketQuote;
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage API provider for stock/equity quotes.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (`ALPHAVANTAGE_API_KEY`).
/// - **Coverage**: 100k+ global equity symbols.
///
/// A rate-limited answer comes back as 200 with a "Note"/"Information" body
/// instead of the expected object, so every missing field is a shape mismatch.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "08. previous close")]
    previous_close: Option<String>,
}

#[derive(Deserialize)]
struct SymbolSearchResponse {
    #[serde(rename = "bestMatches")]
    best_matches: Option<Vec<SymbolMatch>>,
}

#[derive(Deserialize)]
struct SymbolMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name")]
    name: String,
}

fn parse_price(raw: Option<String>, field: &str, symbol: &str) -> Result<f64, CoreError> {
    let raw = raw.ok_or_else(|| CoreError::Api {
        provider: "Alpha Vantage".into(),
        message: format!("Missing {field} for {symbol}. API limit may be exceeded."),
    })?;
    raw.trim().parse().map_err(|e| CoreError::Api {
        provider: "Alpha Vantage".into(),
        message: format!("Invalid {field} format for {symbol}: {e}"),
    })
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn get_quote(&self, symbol: &str) -> Result<MarketQuote, CoreError> {
        let resp: GlobalQuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        let quote = resp.global_quote.ok_or_else(|| CoreError::Api {
            provider: "Alpha Vantage".into(),
            message: format!("No quote data for {symbol}. API limit may be exceeded."),
        })?;

        let current = parse_price(quote.price, "price", symbol)?;
        let previous = parse_price(quote.previous_close, "previous close", symbol)?;
        Ok(MarketQuote::new(current, previous))
    }

    async fn get_company_name(&self, symbol: &str) -> Result<String, CoreError> {
        let resp: SymbolSearchResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "SYMBOL_SEARCH"),
                ("keywords", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("Failed to parse search results for {symbol}: {e}"),
            })?;

        resp.best_matches
            .unwrap_or_default()
            .into_iter()
            .find(|m| m.symbol.eq_ignore_ascii_case(symbol))
            .map(|m| m.name)
            .ok_or_else(|| CoreError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("No company name found for {symbol}"),
            })
    }
}
