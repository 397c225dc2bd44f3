//! Failure taxonomy of the coordinator operations.
//!
//! The `Display` text of each variant is the message callers see in a
//! failure envelope.

use thiserror::Error;

use crate::fabric::SdkError;

/// Errors that end a coordinator operation.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Named channel missing from the connection profile.
    #[error("Channel {0} was not defined in the connection profile")]
    ChannelNotFound(String),

    /// Broadcasting the proposal to the endorsers failed.
    #[error("Failed proposal: {0}")]
    Proposal(#[source] SdkError),

    /// At least one endorser did not approve the proposal.
    #[error("SendProposal: endorsement failure")]
    EndorsementRejected,

    /// The query produced no payloads at all.
    #[error("Unable to fulfil query")]
    QueryEmpty,

    /// The SDK failed while running the query.
    #[error("Failed to query due to error: {0}")]
    Query(#[source] SdkError),

    /// Submitting to the ordering service failed.
    #[error("Failed attachEventHub: {0}")]
    Commit(#[source] SdkError),

    /// The ordering service acknowledged without a status.
    #[error("Failed attachEventHub: ordering service returned no commit status")]
    CommitStatusMissing,

    /// The credential store lookup failed.
    #[error("Failed to load user context: {0}")]
    Enrollment(#[source] SdkError),
}

/// Result type for coordinator internals.
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
