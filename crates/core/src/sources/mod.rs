pub mod registry;
pub mod traits;

// Asset source implementations
pub mod backend;
pub mod local_store;
pub mod market_api;
