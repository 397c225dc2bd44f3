//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;

use chaincode_gateway::config::NetworkConfig;
use chaincode_gateway::fabric::{
    BroadcastResponse, Channel, ChaincodeResponse, Endorsement, EndorsementResponse,
    FabricClient, OrderingRequest, Proposal, ProposalRequest, SdkError, SdkResult, TransactionId,
    UserContext,
};

/// Canned answer for one channel call.
#[derive(Debug, Clone)]
pub enum Script<T> {
    Reply(T),
    Fail(String),
}

impl<T: Clone> Script<T> {
    fn run(&self) -> SdkResult<T> {
        match self {
            Script::Reply(value) => Ok(value.clone()),
            Script::Fail(message) => Err(SdkError::Transport(message.clone())),
        }
    }
}

/// In-memory channel replaying scripted SDK answers.
pub struct ScriptedChannel {
    pub query: Script<Option<Vec<Vec<u8>>>>,
    pub proposal: Script<Vec<EndorsementResponse>>,
    pub broadcast: Script<BroadcastResponse>,
    /// Delay before every query answer.
    pub latency: Duration,
    pub queries: Mutex<Vec<ProposalRequest>>,
    pub proposals: Mutex<Vec<ProposalRequest>>,
    pub orders: Mutex<Vec<OrderingRequest>>,
}

impl Default for ScriptedChannel {
    fn default() -> Self {
        Self {
            query: Script::Reply(Some(Vec::new())),
            proposal: Script::Reply(Vec::new()),
            broadcast: Script::Reply(BroadcastResponse {
                status: Some("SUCCESS".to_string()),
                info: None,
            }),
            latency: Duration::ZERO,
            queries: Mutex::new(Vec::new()),
            proposals: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
        }
    }
}

impl Channel for ScriptedChannel {
    async fn query_by_chaincode(&self, request: &ProposalRequest) -> SdkResult<Option<Vec<Vec<u8>>>> {
        self.queries.lock().unwrap().push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.query.run()
    }

    async fn send_transaction_proposal(
        &self,
        request: &ProposalRequest,
    ) -> SdkResult<(Vec<EndorsementResponse>, Proposal)> {
        self.proposals.lock().unwrap().push(request.clone());
        let responses = self.proposal.run()?;
        Ok((responses, sample_proposal(request)))
    }

    async fn send_transaction(&self, request: &OrderingRequest) -> SdkResult<BroadcastResponse> {
        self.orders.lock().unwrap().push(request.clone());
        self.broadcast.run()
    }
}

/// In-memory client exposing a single scripted channel.
pub struct ScriptedClient {
    pub channel_name: String,
    pub channel: ScriptedChannel,
    pub enrolled: Vec<String>,
}

impl ScriptedClient {
    pub fn new(channel: ScriptedChannel) -> Self {
        Self {
            channel_name: network().channel_name,
            channel,
            enrolled: vec!["admin".to_string()],
        }
    }

    /// Client whose connection profile lacks the configured channel.
    pub fn without_channel() -> Self {
        Self {
            channel_name: "some-other-channel".to_string(),
            channel: ScriptedChannel::default(),
            enrolled: Vec::new(),
        }
    }
}

impl FabricClient for ScriptedClient {
    type Channel = ScriptedChannel;

    fn get_channel(&self, name: &str) -> Option<&ScriptedChannel> {
        (self.channel_name == name).then_some(&self.channel)
    }

    fn new_transaction_id(&self) -> TransactionId {
        TransactionId::new("7f3c9a", "nonce-7f3c9a")
    }

    async fn user_context(&self, username: &str) -> SdkResult<Option<UserContext>> {
        Ok(self
            .enrolled
            .iter()
            .any(|u| u == username)
            .then(|| UserContext {
                name: username.to_string(),
                msp_id: "Org1MSP".to_string(),
            }))
    }
}

pub fn network() -> NetworkConfig {
    NetworkConfig {
        org: "org1".to_string(),
        channel_name: "mychannel".to_string(),
        targets: vec![
            "peer0.org1.example.com".to_string(),
            "peer1.org1.example.com".to_string(),
            "peer0.org2.example.com".to_string(),
        ],
        chaincode_name: "registrar".to_string(),
    }
}

pub fn sample_proposal(request: &ProposalRequest) -> Proposal {
    Proposal(json!({
        "chaincodeId": request.chaincode_id,
        "fcn": request.fcn,
        "txId": request.tx_id.as_ref().map(|t| t.id.clone()),
    }))
}

/// Endorsement with the given status.
pub fn endorsed(peer: &str, status: i32) -> EndorsementResponse {
    EndorsementResponse {
        peer: peer.to_string(),
        response: Some(ChaincodeResponse {
            status,
            message: String::new(),
            payload: b"OK".to_vec(),
        }),
        endorsement: Some(Endorsement {
            endorser: peer.to_string(),
            signature: vec![0x30, 0x44],
        }),
    }
}

/// Peer answer carrying no response object.
pub fn malformed(peer: &str) -> EndorsementResponse {
    EndorsementResponse {
        peer: peer.to_string(),
        response: None,
        endorsement: None,
    }
}

/// Serve a mock SDK gateway on an ephemeral port.
pub async fn start_sdk_gateway(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
