//! Endorsement coordinator: query, propose and commit over a Fabric client.
//!
//! # Responsibilities
//! - Build proposal requests from the static network configuration
//! - Forward them to the channel and interpret the answers
//! - Convert every failure into a failure envelope at the operation boundary
//!
//! # Transaction lifecycle
//! ```text
//! Built → Proposed → Accepted | Rejected
//! Accepted → Committed | CommitFailed
//! ```
//! Every transition is a single attempt; retrying is the caller's decision.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::NetworkConfig;
use crate::coordinator::envelope::ResultEnvelope;
use crate::coordinator::error::{CoordinatorError, CoordinatorResult};
use crate::coordinator::payload::{CommitPayload, EnrollmentPayload, ProposalOutcome, QueryPayload};
use crate::coordinator::policy::{
    build_proposal_result, build_query_result, classify, evaluate_endorsements, Verdict,
};
use crate::fabric::{
    Channel, ChaincodeArgs, EndorsementResponse, FabricClient, OrderingRequest, Proposal,
    ProposalRequest, TransactionId,
};
use crate::observability::metrics;

/// Coordinates chaincode requests for one organisation and channel.
pub struct EndorsementCoordinator<C> {
    client: Arc<C>,
    network: Arc<NetworkConfig>,
}

impl<C> Clone for EndorsementCoordinator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            network: Arc::clone(&self.network),
        }
    }
}

impl<C: FabricClient> EndorsementCoordinator<C> {
    /// Create a coordinator over an enrolled client.
    pub fn new(client: C, network: NetworkConfig) -> Self {
        Self::with_shared_client(Arc::new(client), network)
    }

    pub fn with_shared_client(client: Arc<C>, network: NetworkConfig) -> Self {
        Self {
            client,
            network: Arc::new(network),
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn channel(&self) -> CoordinatorResult<&C::Channel> {
        self.client
            .get_channel(&self.network.channel_name)
            .ok_or_else(|| CoordinatorError::ChannelNotFound(self.network.channel_name.clone()))
    }

    fn request(&self, fcn: &str, args: ChaincodeArgs, tx_id: Option<TransactionId>) -> ProposalRequest {
        ProposalRequest {
            targets: self.network.targets.clone(),
            chaincode_id: self.network.chaincode_name.clone(),
            fcn: fcn.to_string(),
            args,
            chain_id: self.network.channel_name.clone(),
            tx_id,
        }
    }

    /// Evaluate a chaincode function on the configured peers.
    pub async fn query_chaincode(&self, fcn: &str, args: Vec<String>) -> ResultEnvelope<QueryPayload> {
        let start = Instant::now();
        let envelope = match self.run_query(fcn, args).await {
            Ok(payloads) => build_query_result(payloads),
            Err(e) => ResultEnvelope::failure(e.to_string()),
        };

        match &envelope {
            ResultEnvelope::Success(payload) => tracing::info!(
                fcn = %fcn,
                responses = payload.responses.len(),
                "Query fulfilled"
            ),
            ResultEnvelope::Failure(message) => tracing::warn!(fcn = %fcn, reason = %message, "Query failed"),
        }
        metrics::record_query(envelope.is_success());
        metrics::record_duration("query", start);
        envelope
    }

    async fn run_query(&self, fcn: &str, args: Vec<String>) -> CoordinatorResult<Option<Vec<Vec<u8>>>> {
        let channel = self.channel()?;
        let request = self.request(fcn, ChaincodeArgs::Positional(args), None);
        channel
            .query_by_chaincode(&request)
            .await
            .map_err(CoordinatorError::Query)
    }

    /// Send a proposal with positional arguments for endorsement.
    pub async fn propose_transaction(
        &self,
        fcn: &str,
        args: Vec<String>,
    ) -> ResultEnvelope<ProposalOutcome> {
        self.propose(fcn, ChaincodeArgs::Positional(args)).await
    }

    /// Send a proposal whose data travels only in the transient map.
    pub async fn propose_transaction_transient(
        &self,
        fcn: &str,
        transient: BTreeMap<String, String>,
    ) -> ResultEnvelope<ProposalOutcome> {
        self.propose(fcn, ChaincodeArgs::Transient(transient)).await
    }

    async fn propose(&self, fcn: &str, args: ChaincodeArgs) -> ResultEnvelope<ProposalOutcome> {
        let start = Instant::now();
        let envelope = match self.broadcast_proposal(fcn, args).await {
            Ok((tx_id, responses, proposal)) => {
                let decision = evaluate_endorsements(&responses);
                metrics::record_proposal(decision.as_str());
                tracing::info!(
                    tx_id = %tx_id,
                    decision = decision.as_str(),
                    endorsers = responses.len(),
                    "Endorsement round complete"
                );
                build_proposal_result(decision, tx_id, responses, proposal)
            }
            Err(e) => {
                tracing::error!(fcn = %fcn, error = %e, "Proposal not sent");
                ResultEnvelope::failure(e.to_string())
            }
        };
        metrics::record_duration("propose", start);
        envelope
    }

    async fn broadcast_proposal(
        &self,
        fcn: &str,
        args: ChaincodeArgs,
    ) -> CoordinatorResult<(TransactionId, Vec<EndorsementResponse>, Proposal)> {
        let tx_id = self.client.new_transaction_id();
        let request = self.request(fcn, args, Some(tx_id.clone()));
        let channel = self.channel()?;

        tracing::debug!(
            targets = ?request.targets,
            chaincode_id = %request.chaincode_id,
            chain_id = %request.chain_id,
            tx_id = %tx_id,
            "Sending transaction proposal"
        );

        let (responses, proposal) = channel
            .send_transaction_proposal(&request)
            .await
            .map_err(CoordinatorError::Proposal)?;

        for response in &responses {
            let verdict = classify(response);
            metrics::record_endorsement(verdict.as_str());
            match verdict {
                Verdict::Good => {
                    tracing::info!(peer = %response.peer, "Chaincode proposal endorsed")
                }
                Verdict::Bad => tracing::error!(
                    peer = %response.peer,
                    status = ?response.status(),
                    "Chaincode proposal rejected"
                ),
            }
        }

        Ok((tx_id, responses, proposal))
    }

    /// Submit an endorsed proposal to the ordering service.
    pub async fn commit_transaction(
        &self,
        tx_id: TransactionId,
        proposal_responses: Vec<EndorsementResponse>,
        proposal: Proposal,
    ) -> ResultEnvelope<CommitPayload> {
        let start = Instant::now();
        let request = OrderingRequest {
            tx_id,
            proposal_responses,
            proposal,
        };
        let envelope: ResultEnvelope<CommitPayload> = self.submit(&request).await.into();

        match &envelope {
            ResultEnvelope::Success(payload) => tracing::info!(
                tx_id = %request.tx_id,
                commit_status = %payload.commit_status,
                "Transaction submitted for ordering"
            ),
            ResultEnvelope::Failure(message) => {
                tracing::error!(tx_id = %request.tx_id, reason = %message, "Commit failed")
            }
        }
        metrics::record_commit(envelope.is_success());
        metrics::record_duration("commit", start);
        envelope
    }

    /// Commit the payload of an accepted proposal as is.
    pub async fn commit_proposal(&self, outcome: ProposalOutcome) -> ResultEnvelope<CommitPayload> {
        let ProposalOutcome {
            tx_id,
            proposal_responses,
            proposal,
            ..
        } = outcome;
        self.commit_transaction(tx_id, proposal_responses, proposal)
            .await
    }

    async fn submit(&self, request: &OrderingRequest) -> CoordinatorResult<CommitPayload> {
        let channel = self.channel()?;
        tracing::info!(
            tx_id = %request.tx_id,
            endorsements = request.proposal_responses.len(),
            "Sending transaction to orderer"
        );

        let result = channel
            .send_transaction(request)
            .await
            .map_err(CoordinatorError::Commit)?;

        match result.status {
            Some(status) if !status.is_empty() => Ok(CommitPayload {
                commit_status: status,
            }),
            _ => Err(CoordinatorError::CommitStatusMissing),
        }
    }

    /// Report whether a user has been enrolled with the client.
    pub async fn enrollment_status(&self, username: &str) -> ResultEnvelope<EnrollmentPayload> {
        let result = self
            .client
            .user_context(username)
            .await
            .map_err(CoordinatorError::Enrollment)
            .map(|user| EnrollmentPayload {
                username: username.to_string(),
                enrolled: user.is_some(),
            });
        if let Ok(payload) = &result {
            tracing::debug!(username = %username, enrolled = payload.enrolled, "Enrollment checked");
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fabric::{BroadcastResponse, ChaincodeResponse, SdkError, SdkResult, UserContext};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubChannel {
        proposals: Mutex<Vec<ProposalRequest>>,
        statuses: Vec<i32>,
        broadcast_status: Option<String>,
    }

    impl Channel for StubChannel {
        async fn query_by_chaincode(&self, _request: &ProposalRequest) -> SdkResult<Option<Vec<Vec<u8>>>> {
            Ok(Some(vec![b"v".to_vec()]))
        }

        async fn send_transaction_proposal(
            &self,
            request: &ProposalRequest,
        ) -> SdkResult<(Vec<EndorsementResponse>, Proposal)> {
            self.proposals.lock().unwrap().push(request.clone());
            let responses = self
                .statuses
                .iter()
                .map(|status| EndorsementResponse {
                    peer: "peer".to_string(),
                    response: Some(ChaincodeResponse {
                        status: *status,
                        message: String::new(),
                        payload: Vec::new(),
                    }),
                    endorsement: None,
                })
                .collect();
            Ok((responses, Proposal::default()))
        }

        async fn send_transaction(&self, _request: &OrderingRequest) -> SdkResult<BroadcastResponse> {
            Ok(BroadcastResponse {
                status: self.broadcast_status.clone(),
                info: None,
            })
        }
    }

    struct StubClient {
        channel: StubChannel,
    }

    impl FabricClient for StubClient {
        type Channel = StubChannel;

        fn get_channel(&self, name: &str) -> Option<&StubChannel> {
            (name == "mychannel").then_some(&self.channel)
        }

        fn new_transaction_id(&self) -> TransactionId {
            TransactionId::new("tx-1", "nonce-1")
        }

        async fn user_context(&self, username: &str) -> SdkResult<Option<UserContext>> {
            match username {
                "broken" => Err(SdkError::Transport("wallet unavailable".into())),
                "alice" => Ok(Some(UserContext {
                    name: "alice".into(),
                    msp_id: "Org1MSP".into(),
                })),
                _ => Ok(None),
            }
        }
    }

    fn network() -> NetworkConfig {
        NetworkConfig {
            org: "org1".into(),
            channel_name: "mychannel".into(),
            targets: vec!["peer0".into(), "peer1".into()],
            chaincode_name: "registrar".into(),
        }
    }

    fn coordinator(statuses: Vec<i32>, broadcast_status: Option<&str>) -> EndorsementCoordinator<StubClient> {
        EndorsementCoordinator::new(
            StubClient {
                channel: StubChannel {
                    statuses,
                    broadcast_status: broadcast_status.map(str::to_string),
                    ..Default::default()
                },
            },
            network(),
        )
    }

    #[tokio::test]
    async fn test_transient_proposal_request_shape() {
        let coordinator = coordinator(vec![200], Some("SUCCESS"));
        let mut transient = BTreeMap::new();
        transient.insert("password".to_string(), "hunter2".to_string());

        let envelope = coordinator
            .propose_transaction_transient("register", transient.clone())
            .await;
        assert!(envelope.is_success());

        let sent = coordinator.client().channel.proposals.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].targets, vec!["peer0".to_string(), "peer1".to_string()]);
        assert_eq!(sent[0].chaincode_id, "registrar");
        assert_eq!(sent[0].chain_id, "mychannel");
        assert!(sent[0].args.positional().is_empty());
        assert_eq!(sent[0].args.transient_map(), Some(&transient));
        assert_eq!(sent[0].tx_id, Some(TransactionId::new("tx-1", "nonce-1")));
    }

    #[tokio::test]
    async fn test_empty_commit_status_is_failure() {
        let coordinator = coordinator(vec![200], Some(""));
        let outcome = coordinator
            .propose_transaction("register", vec![])
            .await
            .into_payload()
            .unwrap();
        let envelope = coordinator.commit_proposal(outcome).await;
        assert_eq!(
            envelope.message(),
            "Failed attachEventHub: ordering service returned no commit status"
        );

        let coordinator = self::coordinator(vec![200], None);
        let envelope = coordinator
            .commit_transaction(TransactionId::new("tx-1", "n"), vec![], Proposal::default())
            .await;
        assert!(!envelope.is_success());
    }

    #[tokio::test]
    async fn test_non_success_status_passes_through() {
        let coordinator = coordinator(vec![200], Some("BAD_REQUEST"));
        let envelope = coordinator
            .commit_transaction(TransactionId::new("tx-1", "n"), vec![], Proposal::default())
            .await;
        assert_eq!(
            envelope.into_payload(),
            Some(CommitPayload {
                commit_status: "BAD_REQUEST".into()
            })
        );
    }

    #[tokio::test]
    async fn test_enrollment_status() {
        let coordinator = coordinator(vec![], None);

        let alice = coordinator.enrollment_status("alice").await.into_payload().unwrap();
        assert!(alice.enrolled);

        let bob = coordinator.enrollment_status("bob").await.into_payload().unwrap();
        assert!(!bob.enrolled);

        let broken = coordinator.enrollment_status("broken").await;
        assert_eq!(broken.message(), "Failed to load user context: wallet unavailable");
    }
}
