use portfolio_tracker_core::errors::CoreError;
use portfolio_tracker_core::models::asset::{Asset, NewAsset, TrackedAsset};
use portfolio_tracker_core::models::http::{HttpRequest, HttpResponse};
use portfolio_tracker_core::models::quote::MarketQuote;
use portfolio_tracker_core::models::snapshot::{Allocation, ReferenceBasis};

// ── Asset ───────────────────────────────────────────────────────────

#[test]
fn asset_new_uppercases_symbol() {
    let asset = Asset::new(" aapl ", "Apple Inc.", 10.0, "Stock");
    assert_eq!(asset.symbol, "AAPL");
    assert_eq!(asset.purchase_price, None);
    assert!(asset.validate().is_ok());
}

#[test]
fn asset_serializes_with_backend_field_names() {
    let asset = Asset::new("AAPL", "Apple Inc.", 10.0, "Stock").with_purchase_price(150.0);
    let json = serde_json::to_value(&asset).unwrap();
    assert_eq!(json["assetType"], "Stock");
    assert_eq!(json["purchasePrice"], 150.0);
    assert!(json.get("asset_type").is_none());
}

#[test]
fn asset_without_purchase_price_omits_field() {
    let json = serde_json::to_string(&Asset::new("BND", "Bond", 1.0, "Bond")).unwrap();
    assert!(!json.contains("purchasePrice"));
    let back: Asset = serde_json::from_str(&json).unwrap();
    assert_eq!(back.purchase_price, None);
}

#[test]
fn asset_validation_rules() {
    let mut asset = Asset::new("AAPL", "Apple", 1.0, "Stock");
    asset.quantity = -1.0;
    assert!(matches!(asset.validate(), Err(CoreError::ValidationError(_))));

    asset.quantity = f64::NAN;
    assert!(asset.validate().is_err());

    asset.quantity = 0.0;
    assert!(asset.validate().is_ok());

    let priced = Asset::new("AAPL", "Apple", 1.0, "Stock").with_purchase_price(-3.0);
    assert!(priced.validate().is_err());

    let untyped = Asset::new("AAPL", "Apple", 1.0, "  ");
    assert!(untyped.validate().is_err());

    let unnamed = Asset::new("", "Nothing", 1.0, "Stock");
    assert!(unnamed.validate().is_err());
}

// ── NewAsset ────────────────────────────────────────────────────────

#[test]
fn new_asset_normalizes() {
    let asset = NewAsset {
        symbol: " msft".into(),
        name: "  Microsoft  ".into(),
        quantity: 8.0,
        asset_type: " Stock ".into(),
        purchase_price: None,
    }
    .into_asset()
    .unwrap();

    assert_eq!(asset.symbol, "MSFT");
    assert_eq!(asset.name, "Microsoft");
    assert_eq!(asset.asset_type, "Stock");
}

#[test]
fn new_asset_empty_name_falls_back_to_symbol() {
    let asset = NewAsset {
        symbol: "spy".into(),
        quantity: 6.0,
        asset_type: "ETF".into(),
        ..NewAsset::default()
    }
    .into_asset()
    .unwrap();
    assert_eq!(asset.name, "SPY");
}

#[test]
fn new_asset_rejects_blank_symbol() {
    let err = NewAsset {
        symbol: "   ".into(),
        quantity: 1.0,
        asset_type: "Stock".into(),
        ..NewAsset::default()
    }
    .into_asset()
    .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[test]
fn tracked_assets_get_unique_ids() {
    let asset = Asset::new("AAPL", "Apple", 1.0, "Stock");
    let a = TrackedAsset::new(asset.clone());
    let b = TrackedAsset::new(asset);
    assert_ne!(a.id, b.id);
    assert_eq!(a.asset, b.asset);
}

// ── MarketQuote ─────────────────────────────────────────────────────

#[test]
fn quote_validity() {
    assert!(MarketQuote::new(165.0, 160.0).is_valid());
    assert!(MarketQuote::new(0.0, 0.0).is_valid());
    assert!(!MarketQuote::new(-1.0, 160.0).is_valid());
    assert!(!MarketQuote::new(165.0, f64::NAN).is_valid());
    assert!(!MarketQuote::new(f64::INFINITY, 1.0).is_valid());
}

#[test]
fn quote_serializes_camel_case() {
    let json = serde_json::to_value(MarketQuote::new(1.5, 1.0)).unwrap();
    assert_eq!(json["currentPrice"], 1.5);
    assert_eq!(json["previousClose"], 1.0);
}

// ── Allocation / ReferenceBasis ─────────────────────────────────────

#[test]
fn allocation_accumulates_per_type() {
    let mut allocation = Allocation::default();
    allocation.add("Equity", 100.0);
    allocation.add("Bond", 50.0);
    allocation.add("Equity", 25.0);

    assert_eq!(allocation.len(), 2);
    assert_eq!(allocation.labels(), vec!["Equity", "Bond"]);
    assert_eq!(allocation.values(), vec![125.0, 50.0]);
}

#[test]
fn reference_basis_default_and_display() {
    assert_eq!(ReferenceBasis::default(), ReferenceBasis::PreviousClose);
    assert_eq!(ReferenceBasis::PurchasePrice.to_string(), "purchase_price");
    assert_eq!(
        serde_json::to_value(ReferenceBasis::PreviousClose).unwrap(),
        "previous_close"
    );
}

// ── HTTP envelope ───────────────────────────────────────────────────

#[test]
fn get_request_is_bare() {
    let req = HttpRequest::get("/api/assets");
    assert_eq!(req.method, "GET");
    assert!(req.headers.is_empty());
    assert!(req.body.is_empty());
}

#[test]
fn header_lookup_is_case_insensitive() {
    let req = HttpRequest::post_json("/api/assets", b"{}".to_vec());
    assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
    assert_eq!(req.header("accept"), None);

    let mut resp = HttpResponse::new(200, Vec::new());
    resp.headers.push(("X-Request-Id".into(), "42".into()));
    assert_eq!(resp.header("x-request-id"), Some("42"));
}
