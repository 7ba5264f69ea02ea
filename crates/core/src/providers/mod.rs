pub mod registry;
pub mod traits;

// Market-data provider implementations
pub mod alphavantage;
pub mod synthetic;
pub mod yahoo_finance;
