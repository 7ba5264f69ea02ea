pub mod asset;
pub mod chart;
pub mod http;
pub mod quote;
pub mod snapshot;
