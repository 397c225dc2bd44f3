//! Chaincode gateway library.
//!
//! Formats chaincode queries and transaction proposals, forwards them to a
//! Fabric client SDK, applies an all-or-nothing endorsement rule and returns
//! every outcome as a uniform result envelope.

pub mod config;
pub mod coordinator;
pub mod fabric;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use coordinator::{EndorsementCoordinator, ResultEnvelope};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
