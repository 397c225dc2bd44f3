//! Fabric client binding that talks to an SDK REST gateway.
//!
//! # Responsibilities
//! - Expose the configured channel through the `FabricClient` contract
//! - Forward query, proposal and ordering requests as JSON
//! - Bound every call by the configured SDK timeout
//! - Mint transaction ids locally

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;
use uuid::Uuid;

use crate::config::schema::{NetworkConfig, SdkConfig};
use crate::fabric::client::{Channel, FabricClient};
use crate::fabric::types::{
    BroadcastResponse, EndorsementResponse, OrderingRequest, Proposal, ProposalRequest, SdkError,
    SdkResult, TransactionId, UserContext,
};

/// Body of a query answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryReply {
    #[serde(default)]
    pub payloads: Option<Vec<Vec<u8>>>,
}

/// Body of a proposal answer.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalReply {
    pub proposal_responses: Vec<EndorsementResponse>,
    pub proposal: Proposal,
}

/// Shared transport settings.
#[derive(Debug, Clone)]
struct Transport {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl Transport {
    fn url(&self, segments: &[&str]) -> SdkResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SdkError::Config(format!("endpoint '{}' cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn bounded<T>(&self, fut: impl Future<Output = SdkResult<T>>) -> SdkResult<T> {
        match timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SdkError::Timeout(self.timeout.as_secs())),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> SdkResult<T> {
        self.bounded(self.send_post(url, body)).await
    }

    async fn send_post<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> SdkResult<T> {
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        decode(resp).await
    }

    /// GET a resource, mapping 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> SdkResult<Option<T>> {
        self.bounded(self.send_get_optional(url)).await
    }

    async fn send_get_optional<T: DeserializeOwned>(&self, url: Url) -> SdkResult<Option<T>> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(resp).await.map(Some)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> SdkResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SdkError::Status {
            code: status.as_u16(),
            body,
        });
    }
    resp.json::<T>()
        .await
        .map_err(|e| SdkError::Decode(e.to_string()))
}

/// Channel reached through the REST gateway.
#[derive(Debug, Clone)]
pub struct RestChannel {
    name: String,
    transport: Transport,
}

impl Channel for RestChannel {
    async fn query_by_chaincode(&self, request: &ProposalRequest) -> SdkResult<Option<Vec<Vec<u8>>>> {
        let url = self.transport.url(&["channels", &self.name, "query"])?;
        let reply: QueryReply = self.transport.post(url, request).await?;
        Ok(reply.payloads)
    }

    async fn send_transaction_proposal(
        &self,
        request: &ProposalRequest,
    ) -> SdkResult<(Vec<EndorsementResponse>, Proposal)> {
        let url = self.transport.url(&["channels", &self.name, "proposals"])?;
        let reply: ProposalReply = self.transport.post(url, request).await?;
        Ok((reply.proposal_responses, reply.proposal))
    }

    async fn send_transaction(&self, request: &OrderingRequest) -> SdkResult<BroadcastResponse> {
        let url = self.transport.url(&["channels", &self.name, "transactions"])?;
        self.transport.post(url, request).await
    }
}

/// Fabric client backed by an SDK REST gateway.
#[derive(Debug, Clone)]
pub struct RestClient {
    org: String,
    channel: RestChannel,
    transport: Transport,
}

impl RestClient {
    /// Create a client for the configured organisation and channel.
    ///
    /// No connection is made until the first request.
    pub fn new(network: &NetworkConfig, sdk: &SdkConfig) -> SdkResult<Self> {
        let base: Url = sdk.endpoint.parse().map_err(|e| {
            SdkError::Config(format!("Invalid SDK endpoint '{}': {}", sdk.endpoint, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(SdkError::Config(format!(
                "SDK endpoint '{}' cannot be a base URL",
                sdk.endpoint
            )));
        }

        let timeout = Duration::from_secs(sdk.timeout_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| SdkError::Config(e.to_string()))?;

        let transport = Transport {
            http,
            base,
            timeout,
        };

        tracing::info!(
            endpoint = %sdk.endpoint,
            org = %network.org,
            channel = %network.channel_name,
            "Fabric SDK client initialized"
        );

        Ok(Self {
            org: network.org.clone(),
            channel: RestChannel {
                name: network.channel_name.clone(),
                transport: transport.clone(),
            },
            transport,
        })
    }

    /// Organisation this client acts for.
    pub fn org(&self) -> &str {
        &self.org
    }
}

impl FabricClient for RestClient {
    type Channel = RestChannel;

    fn get_channel(&self, name: &str) -> Option<&RestChannel> {
        (self.channel.name == name).then_some(&self.channel)
    }

    fn new_transaction_id(&self) -> TransactionId {
        let nonce = Uuid::new_v4().simple().to_string();
        let id = Uuid::new_v4().simple().to_string();
        TransactionId::new(id, nonce)
    }

    async fn user_context(&self, username: &str) -> SdkResult<Option<UserContext>> {
        let url = self.transport.url(&["users", username])?;
        self.transport.get_optional(url).await
    }
}
