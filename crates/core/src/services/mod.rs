pub mod aggregation_service;
pub mod chart_service;
pub mod quote_service;
pub mod resolver_service;
