pub mod client;
pub mod connector;
pub mod transport;
