use crate::models::chart::{AllocationChart, PerformanceChart, RenderedView, TableRow};
use crate::models::snapshot::{HoldingRow, PortfolioSnapshot};

/// Doughnut slice colors, cycled when there are more categories.
pub const ALLOCATION_PALETTE: [&str; 5] = ["#2c3e50", "#34495e", "#7f8c8d", "#95a5a6", "#bdc3c7"];

pub const GAIN_FILL: &str = "rgba(76, 175, 80, 0.6)";
pub const GAIN_BORDER: &str = "rgba(76, 175, 80, 1)";
pub const LOSS_FILL: &str = "rgba(244, 67, 54, 0.6)";
pub const LOSS_BORDER: &str = "rgba(244, 67, 54, 1)";

pub const PERFORMANCE_LABEL: &str = "Performance ($)";

/// Generates chart-ready data sets and table rows from a snapshot.
///
/// The core computes all the numbers; the frontend only renders.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Table rows plus both chart datasets.
    pub fn render(&self, snapshot: &PortfolioSnapshot) -> RenderedView {
        RenderedView {
            rows: snapshot.holdings.iter().map(Self::table_row).collect(),
            allocation: self.allocation_chart(snapshot),
            performance: self.performance_chart(snapshot),
        }
    }

    /// Market value per asset type, in first-seen category order.
    pub fn allocation_chart(&self, snapshot: &PortfolioSnapshot) -> AllocationChart {
        let labels: Vec<String> = snapshot
            .allocation
            .labels()
            .into_iter()
            .map(String::from)
            .collect();
        let colors = (0..labels.len())
            .map(|i| ALLOCATION_PALETTE[i % ALLOCATION_PALETTE.len()].to_string())
            .collect();
        AllocationChart {
            labels,
            values: snapshot.allocation.values(),
            colors,
        }
    }

    /// Gain/loss per asset; non-negative bars are green, negative ones red.
    pub fn performance_chart(&self, snapshot: &PortfolioSnapshot) -> PerformanceChart {
        let mut chart = PerformanceChart {
            label: PERFORMANCE_LABEL.to_string(),
            labels: Vec::with_capacity(snapshot.performance.len()),
            values: Vec::with_capacity(snapshot.performance.len()),
            background_colors: Vec::with_capacity(snapshot.performance.len()),
            border_colors: Vec::with_capacity(snapshot.performance.len()),
        };
        for point in &snapshot.performance {
            let (fill, border) = if point.performance >= 0.0 {
                (GAIN_FILL, GAIN_BORDER)
            } else {
                (LOSS_FILL, LOSS_BORDER)
            };
            chart.labels.push(point.symbol.clone());
            chart.values.push(point.performance);
            chart.background_colors.push(fill.to_string());
            chart.border_colors.push(border.to_string());
        }
        chart
    }

    fn table_row(row: &HoldingRow) -> TableRow {
        let sign = if row.gain_percent >= 0.0 { "+" } else { "" };
        TableRow {
            symbol: row.symbol.clone(),
            name: row.name.clone(),
            quantity: format_quantity(row.quantity),
            market_value: format_money(row.market_value),
            market_price: format_money(row.market_price),
            gain_percent: format!("{sign}{:.2}%", row.gain_percent),
            gain_value: format_money(row.gain_value),
            positive: row.gain_value >= 0.0,
            asset_type: row.asset_type.clone(),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// `$1234.50`, `-$12.00` for negatives.
pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${value:.2}")
    }
}

/// Whole quantities print without decimals, fractional ones as given.
fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        quantity.to_string()
    }
}
