//! Endorsement coordination subsystem.
//!
//! # Data Flow
//! ```text
//! caller (HTTP handler, CLI, library user)
//!     → service.rs (build request, call channel)
//!     → policy.rs (all-or-nothing endorsement decision)
//!     → envelope.rs (Success(payload) | Failure(message))
//!     → caller
//! ```
//!
//! # Design Decisions
//! - No operation returns an error or panics; failures become envelopes
//! - The accepted proposal payload is exactly the commit input
//! - No retries, caching or shared mutable state

pub mod envelope;
pub mod error;
pub mod payload;
pub mod policy;
pub mod service;

pub use envelope::ResultEnvelope;
pub use error::{CoordinatorError, CoordinatorResult};
pub use payload::{CommitPayload, EnrollmentPayload, ProposalOutcome, QueryPayload};
pub use policy::{
    build_proposal_result, build_query_result, classify, evaluate_endorsements, Decision, Verdict,
};
pub use service::EndorsementCoordinator;
