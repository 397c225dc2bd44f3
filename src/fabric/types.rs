//! Request/response shapes exchanged with the Fabric client SDK, and SDK error definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Status code a peer returns for a successfully simulated chaincode call.
pub const ENDORSEMENT_OK: i32 = 200;

/// Errors surfaced by the SDK binding.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport or SDK-level failure, carried verbatim.
    #[error("{0}")]
    Transport(String),

    /// SDK request timed out.
    #[error("SDK request timed out after {0} seconds")]
    Timeout(u64),

    /// SDK gateway answered with a non-success HTTP status.
    #[error("SDK gateway returned {code}: {body}")]
    Status { code: u16, body: String },

    /// SDK answer could not be decoded.
    #[error("Malformed SDK response: {0}")]
    Decode(String),

    /// SDK binding misconfigured.
    #[error("SDK configuration error: {0}")]
    Config(String),
}

/// Result type for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Transaction identifier minted by the client collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionId {
    /// Hex transaction id as the ledger records it.
    pub id: String,
    /// Nonce the id was derived from.
    pub nonce: String,
}

impl TransactionId {
    pub fn new(id: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nonce: nonce.into(),
        }
    }

    /// The printable transaction id.
    pub fn transaction_id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Chaincode invocation arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaincodeArgs {
    /// Ordered string arguments, written to the ledger with the proposal.
    Positional(Vec<String>),
    /// Private key/value data passed in the transient map.
    Transient(BTreeMap<String, String>),
}

impl ChaincodeArgs {
    /// Positional args as sent on the wire; transient calls send none.
    pub fn positional(&self) -> &[String] {
        match self {
            ChaincodeArgs::Positional(args) => args,
            ChaincodeArgs::Transient(_) => &[],
        }
    }

    pub fn transient_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ChaincodeArgs::Positional(_) => None,
            ChaincodeArgs::Transient(map) => Some(map),
        }
    }
}

/// A chaincode query or transaction proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRequest {
    /// Peers asked to execute the request.
    pub targets: Vec<String>,
    pub chaincode_id: String,
    pub fcn: String,
    pub args: ChaincodeArgs,
    /// Channel the request runs on.
    pub chain_id: String,
    /// Present for transaction proposals, absent for queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<TransactionId>,
}

/// Chaincode execution result reported by one peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeResponse {
    pub status: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub payload: Vec<u8>,
}

/// Peer signature over the proposal response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsement {
    pub endorser: String,
    pub signature: Vec<u8>,
}

/// One peer's answer to a transaction proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementResponse {
    pub peer: String,
    /// `None` when the peer returned an error instead of a response.
    #[serde(default)]
    pub response: Option<ChaincodeResponse>,
    #[serde(default)]
    pub endorsement: Option<Endorsement>,
}

impl EndorsementResponse {
    pub fn status(&self) -> Option<i32> {
        self.response.as_ref().map(|r| r.status)
    }
}

/// Opaque proposal object produced by the SDK.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proposal(pub serde_json::Value);

/// Endorsed transaction handed to the ordering service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingRequest {
    pub tx_id: TransactionId,
    pub proposal_responses: Vec<EndorsementResponse>,
    pub proposal: Proposal,
}

/// Ordering service acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

/// Enrolled identity as known to the client's credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub name: String,
    #[serde(default)]
    pub msp_id: String,
}
