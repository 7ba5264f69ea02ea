use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which price a holding's gain/loss is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceBasis {
    /// Day-over-day: gain is measured against the previous close.
    #[default]
    PreviousClose,
    /// Cost basis: gain is measured against the asset's purchase price.
    /// Assets without a purchase price fall back to the previous close.
    PurchasePrice,
}

impl std::fmt::Display for ReferenceBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceBasis::PreviousClose => write!(f, "previous_close"),
            ReferenceBasis::PurchasePrice => write!(f, "purchase_price"),
        }
    }
}

/// Aggregated figures for a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRow {
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub asset_type: String,

    /// Current price per unit (0 when no quote was available)
    pub market_price: f64,

    /// current price × quantity
    pub market_value: f64,

    /// Price the gain is measured against. 0 for a row without a quote,
    /// unless the basis is the recorded purchase price.
    pub reference_price: f64,

    /// market value − reference price × quantity
    pub gain_value: f64,

    /// Percentage change against the reference price; 0 when the reference is 0
    pub gain_percent: f64,

    /// `false` when enrichment failed and the figures are placeholders
    pub quote_available: bool,
}

/// Market value of one asset category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub asset_type: String,
    pub market_value: f64,
}

/// Market value grouped by asset type, in first-seen category order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub slices: Vec<AllocationSlice>,
}

impl Allocation {
    /// Add `value` to `asset_type`, appending the category if it is new.
    pub fn add(&mut self, asset_type: &str, value: f64) {
        match self.slices.iter_mut().find(|s| s.asset_type == asset_type) {
            Some(slice) => slice.market_value += value,
            None => self.slices.push(AllocationSlice {
                asset_type: asset_type.to_string(),
                market_value: value,
            }),
        }
    }

    pub fn get(&self, asset_type: &str) -> Option<f64> {
        self.slices
            .iter()
            .find(|s| s.asset_type == asset_type)
            .map(|s| s.market_value)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.slices.iter().map(|s| s.asset_type.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.slices.iter().map(|s| s.market_value).collect()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Gain/loss of one holding, for the performance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub symbol: String,
    pub performance: f64,
}

/// Everything needed to render the holdings table and both charts.
///
/// Rebuilt from scratch on every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// When the snapshot was computed
    pub as_of: DateTime<Utc>,

    /// Basis used for gain/loss figures
    pub basis: ReferenceBasis,

    /// One row per asset, in list order
    pub holdings: Vec<HoldingRow>,

    pub allocation: Allocation,

    pub performance: Vec<PerformancePoint>,

    /// Sum of all market values
    pub total_value: f64,

    /// Sum of all gain values
    pub total_gain: f64,
}
