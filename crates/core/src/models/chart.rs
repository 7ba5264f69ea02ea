use serde::{Deserialize, Serialize};

/// Doughnut chart data: market value per asset type.
///
/// The core computes all the numbers and colors; the frontend only draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

/// Bar chart data: gain/loss per asset, green when non-negative, red otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceChart {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub background_colors: Vec<String>,
    pub border_colors: Vec<String>,
}

/// Display strings for one holdings-table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub symbol: String,
    pub name: String,
    pub quantity: String,
    pub market_value: String,
    pub market_price: String,
    pub gain_percent: String,
    pub gain_value: String,
    /// `true` renders with the "positive" style, `false` with "negative"
    pub positive: bool,
    pub asset_type: String,
}

/// A fully rendered view: table rows plus both chart datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedView {
    pub rows: Vec<TableRow>,
    pub allocation: AllocationChart,
    pub performance: PerformanceChart,
}
