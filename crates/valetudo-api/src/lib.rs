// valetudo-api: Async Rust client for the Valetudo robot vacuum HTTP API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ValetudoClient;
pub use endpoints::Endpoint;
pub use error::Error;
pub use transport::{Transport, TransportConfig};
