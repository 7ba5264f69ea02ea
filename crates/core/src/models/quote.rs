use serde::{Deserialize, Serialize};

/// Current and previous-close price for a symbol.
///
/// Fetched once per render cycle and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuote {
    pub current_price: f64,
    pub previous_close: f64,
}

impl MarketQuote {
    pub fn new(current_price: f64, previous_close: f64) -> Self {
        Self {
            current_price,
            previous_close,
        }
    }

    /// Both prices finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.current_price.is_finite()
            && self.current_price >= 0.0
            && self.previous_close.is_finite()
            && self.previous_close >= 0.0
    }
}
