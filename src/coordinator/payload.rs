//! Payloads carried by successful envelopes.

use serde::{Deserialize, Serialize};

use crate::fabric::{EndorsementResponse, OrderingRequest, Proposal, TransactionId};

/// Decoded query answers, one per payload returned by the peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPayload {
    pub responses: Vec<String>,
}

/// Everything a later commit needs from an accepted proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalOutcome {
    pub tx_id: TransactionId,
    pub tx_id_string: String,
    pub proposal_responses: Vec<EndorsementResponse>,
    pub proposal: Proposal,
}

impl From<ProposalOutcome> for OrderingRequest {
    fn from(outcome: ProposalOutcome) -> Self {
        OrderingRequest {
            tx_id: outcome.tx_id,
            proposal_responses: outcome.proposal_responses,
            proposal: outcome.proposal,
        }
    }
}

/// Ordering service status, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPayload {
    pub commit_status: String,
}

/// Whether a user is known to the client's credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentPayload {
    pub username: String,
    pub enrolled: bool,
}
