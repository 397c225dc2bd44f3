//! Fabric client SDK integration subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkConfig + SdkConfig
//!     → rest.rs (SDK gateway binding, timeouts)
//!     → client.rs (FabricClient / Channel contracts)
//!     → coordinator (query, propose, commit)
//! ```
//!
//! # Constraints
//! - Identity, signing and peer transport live behind the SDK
//! - Every SDK call is bounded by the configured timeout
//! - Unknown channels are reported, never created on the fly

pub mod client;
pub mod rest;
pub mod types;

pub use client::{Channel, FabricClient};
pub use rest::RestClient;
pub use types::{
    BroadcastResponse, ChaincodeArgs, ChaincodeResponse, Endorsement, EndorsementResponse,
    OrderingRequest, Proposal, ProposalRequest, SdkError, SdkResult, TransactionId, UserContext,
    ENDORSEMENT_OK,
};
