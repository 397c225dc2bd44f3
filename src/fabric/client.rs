//! Collaborator contracts the coordinator consumes from a Fabric client SDK.
//!
//! Implementations own identity, signing, peer transport and ordering; the
//! coordinator only formats requests and interprets results.

use std::future::Future;

use crate::fabric::types::{
    BroadcastResponse, EndorsementResponse, OrderingRequest, Proposal, ProposalRequest, SdkResult,
    TransactionId, UserContext,
};

/// An enrolled client bound to a connection profile.
pub trait FabricClient: Send + Sync {
    type Channel: Channel;

    /// Look up a channel declared in the connection profile.
    fn get_channel(&self, name: &str) -> Option<&Self::Channel>;

    /// Mint a fresh transaction id for a proposal.
    fn new_transaction_id(&self) -> TransactionId;

    /// Load a user from the credential store, `None` if never enrolled.
    fn user_context(
        &self,
        username: &str,
    ) -> impl Future<Output = SdkResult<Option<UserContext>>> + Send;
}

/// A channel handle capable of reaching its peers and orderers.
pub trait Channel: Send + Sync {
    /// Evaluate a chaincode function on the target peers without ordering.
    ///
    /// `Ok(None)` means the SDK produced no payloads at all.
    fn query_by_chaincode(
        &self,
        request: &ProposalRequest,
    ) -> impl Future<Output = SdkResult<Option<Vec<Vec<u8>>>>> + Send;

    /// Broadcast a proposal for endorsement, returning every peer's answer
    /// together with the proposal that was signed.
    fn send_transaction_proposal(
        &self,
        request: &ProposalRequest,
    ) -> impl Future<Output = SdkResult<(Vec<EndorsementResponse>, Proposal)>> + Send;

    /// Submit an endorsed transaction to the ordering service.
    fn send_transaction(
        &self,
        request: &OrderingRequest,
    ) -> impl Future<Output = SdkResult<BroadcastResponse>> + Send;
}
