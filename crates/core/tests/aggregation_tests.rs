// ═══════════════════════════════════════════════════════════════════
// Aggregation Tests — gain/loss math, allocation, placeholders,
// chart datasets and table formatting
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use portfolio_tracker_core::models::asset::Asset;
use portfolio_tracker_core::models::quote::MarketQuote;
use portfolio_tracker_core::models::snapshot::ReferenceBasis;
use portfolio_tracker_core::services::aggregation_service::{gain_percent, AggregationService};
use portfolio_tracker_core::services::chart_service::{
    format_money, ChartService, ALLOCATION_PALETTE, GAIN_BORDER, GAIN_FILL, LOSS_BORDER,
    LOSS_FILL, PERFORMANCE_LABEL,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn quotes(entries: &[(&str, f64, f64)]) -> HashMap<String, MarketQuote> {
    entries
        .iter()
        .map(|(s, c, p)| (s.to_string(), MarketQuote::new(*c, *p)))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
// Gain percentage
// ═══════════════════════════════════════════════════════════════════

mod gain {
    use super::*;

    #[test]
    fn positive_and_negative_change() {
        assert!(approx(gain_percent(110.0, 100.0), 10.0));
        assert!(approx(gain_percent(90.0, 100.0), -10.0));
        assert!(approx(gain_percent(100.0, 100.0), 0.0));
    }

    #[test]
    fn zero_reference_is_zero_not_infinity() {
        assert_eq!(gain_percent(50.0, 0.0), 0.0);
        assert_eq!(gain_percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn non_finite_inputs_are_zero() {
        assert_eq!(gain_percent(f64::NAN, 100.0), 0.0);
        assert_eq!(gain_percent(100.0, f64::INFINITY), 0.0);
        assert_eq!(gain_percent(100.0, -5.0), 0.0);
    }

    #[test]
    fn reference_price_per_basis() {
        let with_cost = Asset::new("AAPL", "Apple", 1.0, "Stock").with_purchase_price(150.0);
        let without_cost = Asset::new("MSFT", "Microsoft", 1.0, "Stock");
        let quote = MarketQuote::new(165.0, 160.0);

        assert_eq!(
            AggregationService::reference_price(&with_cost, &quote, ReferenceBasis::PreviousClose),
            160.0
        );
        assert_eq!(
            AggregationService::reference_price(&with_cost, &quote, ReferenceBasis::PurchasePrice),
            150.0
        );
        assert_eq!(
            AggregationService::reference_price(&without_cost, &quote, ReferenceBasis::PurchasePrice),
            160.0
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// Snapshot aggregation
// ═══════════════════════════════════════════════════════════════════

mod aggregate {
    use super::*;

    #[test]
    fn purchase_price_basis_example() {
        let assets = vec![Asset::new("AAPL", "Apple Inc.", 10.0, "Stock").with_purchase_price(150.0)];
        let snapshot = AggregationService::new().aggregate(
            &assets,
            &quotes(&[("AAPL", 165.0, 160.0)]),
            ReferenceBasis::PurchasePrice,
        );

        let row = &snapshot.holdings[0];
        assert!(approx(row.market_value, 1650.0));
        assert!(approx(row.gain_value, 150.0));
        assert!(approx(row.gain_percent, 10.0));
        assert!(row.quote_available);
        assert!(approx(snapshot.total_value, 1650.0));
        assert!(approx(snapshot.total_gain, 150.0));
        assert_eq!(snapshot.basis, ReferenceBasis::PurchasePrice);
    }

    #[test]
    fn previous_close_basis_is_day_over_day() {
        let assets = vec![Asset::new("AAPL", "Apple Inc.", 10.0, "Stock").with_purchase_price(150.0)];
        let snapshot = AggregationService::default().aggregate(
            &assets,
            &quotes(&[("AAPL", 165.0, 160.0)]),
            ReferenceBasis::PreviousClose,
        );

        let row = &snapshot.holdings[0];
        assert!(approx(row.reference_price, 160.0));
        assert!(approx(row.gain_value, 50.0));
        assert!(approx(row.gain_percent, 3.125));
    }

    #[test]
    fn allocation_groups_by_type_in_first_seen_order() {
        let assets = vec![
            Asset::new("AAA", "A", 1.0, "Equity"),
            Asset::new("BBB", "B", 2.0, "Bond"),
            Asset::new("CCC", "C", 5.0, "Equity"),
        ];
        let snapshot = AggregationService::new().aggregate(
            &assets,
            &quotes(&[("AAA", 100.0, 100.0), ("BBB", 25.0, 25.0), ("CCC", 5.0, 5.0)]),
            ReferenceBasis::PreviousClose,
        );

        assert_eq!(snapshot.allocation.labels(), vec!["Equity", "Bond"]);
        assert_eq!(snapshot.allocation.get("Equity"), Some(125.0));
        assert_eq!(snapshot.allocation.get("Bond"), Some(50.0));
        assert_eq!(snapshot.allocation.get("Cash"), None);
        assert!(approx(snapshot.total_value, 175.0));
    }

    #[test]
    fn duplicate_symbols_are_separate_rows() {
        let assets = vec![
            Asset::new("AAPL", "Lot 1", 1.0, "Stock"),
            Asset::new("AAPL", "Lot 2", 2.0, "Stock"),
        ];
        let snapshot = AggregationService::new().aggregate(
            &assets,
            &quotes(&[("AAPL", 10.0, 10.0)]),
            ReferenceBasis::PreviousClose,
        );
        assert_eq!(snapshot.holdings.len(), 2);
        assert_eq!(snapshot.performance.len(), 2);
        assert_eq!(snapshot.allocation.get("Stock"), Some(30.0));
    }

    #[test]
    fn zero_quantity_has_zero_gain() {
        let assets = vec![Asset::new("AAPL", "Apple", 0.0, "Stock")];
        let snapshot = AggregationService::new().aggregate(
            &assets,
            &quotes(&[("AAPL", 165.0, 100.0)]),
            ReferenceBasis::PreviousClose,
        );
        let row = &snapshot.holdings[0];
        assert_eq!(row.market_value, 0.0);
        assert_eq!(row.gain_value, 0.0);
        assert_eq!(row.gain_percent, 0.0);
    }

    #[test]
    fn zero_previous_close_has_zero_percent() {
        let assets = vec![Asset::new("NEW", "Fresh listing", 3.0, "Stock")];
        let snapshot = AggregationService::new().aggregate(
            &assets,
            &quotes(&[("NEW", 20.0, 0.0)]),
            ReferenceBasis::PreviousClose,
        );
        let row = &snapshot.holdings[0];
        assert!(approx(row.gain_value, 60.0));
        assert_eq!(row.gain_percent, 0.0);
    }

    #[test]
    fn missing_quote_yields_placeholder_row() {
        let assets = vec![
            Asset::new("AAPL", "Apple", 10.0, "Stock"),
            Asset::new("GONE", "Delisted", 4.0, "Stock"),
        ];
        let snapshot = AggregationService::new().aggregate(
            &assets,
            &quotes(&[("AAPL", 10.0, 10.0)]),
            ReferenceBasis::PreviousClose,
        );

        assert_eq!(snapshot.holdings.len(), 2);
        let placeholder = &snapshot.holdings[1];
        assert!(!placeholder.quote_available);
        assert_eq!(placeholder.market_price, 0.0);
        assert_eq!(placeholder.market_value, 0.0);
        assert_eq!(placeholder.gain_percent, 0.0);
        assert!(approx(snapshot.total_value, 100.0));
    }

    #[test]
    fn placeholder_reference_follows_basis() {
        let assets = vec![Asset::new("GONE", "Delisted", 4.0, "Stock").with_purchase_price(20.0)];
        let service = AggregationService::new();

        let day_over_day = service.aggregate(&assets, &HashMap::new(), ReferenceBasis::PreviousClose);
        assert_eq!(day_over_day.holdings[0].reference_price, 0.0);

        let since_purchase = service.aggregate(&assets, &HashMap::new(), ReferenceBasis::PurchasePrice);
        assert_eq!(since_purchase.holdings[0].reference_price, 20.0);
        assert_eq!(since_purchase.holdings[0].gain_value, 0.0);
    }

    #[test]
    fn empty_list_is_empty_snapshot() {
        let snapshot =
            AggregationService::new().aggregate(&[], &HashMap::new(), ReferenceBasis::PreviousClose);
        assert!(snapshot.holdings.is_empty());
        assert!(snapshot.allocation.is_empty());
        assert!(snapshot.performance.is_empty());
        assert_eq!(snapshot.total_value, 0.0);
        assert_eq!(snapshot.total_gain, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Charts & table rows
// ═══════════════════════════════════════════════════════════════════

mod charts {
    use super::*;

    fn sample_view() -> portfolio_tracker_core::models::chart::RenderedView {
        let assets = vec![
            Asset::new("AAPL", "Apple Inc.", 10.0, "Stock").with_purchase_price(150.0),
            Asset::new("BND", "Bond Fund", 2.5, "Bond").with_purchase_price(80.0),
        ];
        let snapshot = AggregationService::new().aggregate(
            &assets,
            &quotes(&[("AAPL", 165.0, 160.0), ("BND", 75.0, 76.0)]),
            ReferenceBasis::PurchasePrice,
        );
        ChartService::new().render(&snapshot)
    }

    #[test]
    fn table_row_formatting() {
        let view = sample_view();
        let aapl = &view.rows[0];
        assert_eq!(aapl.symbol, "AAPL");
        assert_eq!(aapl.quantity, "10");
        assert_eq!(aapl.market_value, "$1650.00");
        assert_eq!(aapl.market_price, "$165.00");
        assert_eq!(aapl.gain_percent, "+10.00%");
        assert_eq!(aapl.gain_value, "$150.00");
        assert!(aapl.positive);

        let bnd = &view.rows[1];
        assert_eq!(bnd.quantity, "2.5");
        assert_eq!(bnd.gain_percent, "-6.25%");
        assert_eq!(bnd.gain_value, "-$12.50");
        assert!(!bnd.positive);
    }

    #[test]
    fn performance_colors_follow_sign() {
        let view = sample_view();
        let perf = &view.performance;
        assert_eq!(perf.label, PERFORMANCE_LABEL);
        assert_eq!(perf.labels, vec!["AAPL", "BND"]);
        assert_eq!(perf.background_colors, vec![GAIN_FILL, LOSS_FILL]);
        assert_eq!(perf.border_colors, vec![GAIN_BORDER, LOSS_BORDER]);
    }

    #[test]
    fn zero_gain_is_drawn_as_gain() {
        let assets = vec![Asset::new("FLAT", "Flat", 1.0, "Stock")];
        let snapshot = AggregationService::new().aggregate(
            &assets,
            &quotes(&[("FLAT", 10.0, 10.0)]),
            ReferenceBasis::PreviousClose,
        );
        let view = ChartService::default().render(&snapshot);
        assert_eq!(view.performance.background_colors, vec![GAIN_FILL]);
        assert_eq!(view.rows[0].gain_percent, "+0.00%");
        assert!(view.rows[0].positive);
    }

    #[test]
    fn allocation_palette_cycles() {
        let types = ["A", "B", "C", "D", "E", "F", "G"];
        let assets: Vec<Asset> = types
            .iter()
            .map(|t| Asset::new(format!("S{t}"), "x", 1.0, *t))
            .collect();
        let q: HashMap<String, MarketQuote> = assets
            .iter()
            .map(|a| (a.symbol.clone(), MarketQuote::new(1.0, 1.0)))
            .collect();
        let snapshot = AggregationService::new().aggregate(&assets, &q, ReferenceBasis::PreviousClose);
        let chart = ChartService::new().allocation_chart(&snapshot);

        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.colors[0], ALLOCATION_PALETTE[0]);
        assert_eq!(chart.colors[4], ALLOCATION_PALETTE[4]);
        assert_eq!(chart.colors[5], ALLOCATION_PALETTE[0]);
        assert_eq!(chart.colors[6], ALLOCATION_PALETTE[1]);
    }

    #[test]
    fn allocation_chart_matches_snapshot() {
        let view = sample_view();
        assert_eq!(view.allocation.labels, vec!["Stock", "Bond"]);
        assert!(approx(view.allocation.values[0], 1650.0));
        assert!(approx(view.allocation.values[1], 187.5));
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234.5), "$1234.50");
        assert_eq!(format_money(-12.0), "-$12.00");
    }

    #[test]
    fn rendered_view_serializes_to_json() {
        let json = serde_json::to_value(sample_view()).unwrap();
        assert_eq!(json["rows"][0]["symbol"], "AAPL");
        assert_eq!(json["allocation"]["labels"][1], "Bond");
    }
}
