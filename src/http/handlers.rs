//! Route handlers exposing the coordinator operations.
//!
//! Every handler answers with the result envelope as JSON body: 200 on
//! success, 502 when the blockchain side failed, 400 for an unreadable body
//! and 408 when the request outlives its deadline.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::coordinator::ResultEnvelope;
use crate::fabric::{FabricClient, OrderingRequest};
use crate::http::request::RequestId;
use crate::http::server::AppState;

/// Body of query and proposal calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeBody {
    pub fcn: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Body of a transient proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransientBody {
    pub fcn: String,
    #[serde(default)]
    pub transient: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub channel: String,
    pub chaincode: String,
}

/// JSON body extractor whose rejection is a failure envelope.
pub struct EnvelopeJson<T>(pub T);

impl<S, T> FromRequest<S> for EnvelopeJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(
                    status = %rejection.status(),
                    reason = %rejection.body_text(),
                    "Rejected request body"
                );
                Err(failure_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid request body: {}", rejection.body_text()),
                ))
            }
        }
    }
}

fn failure_response(status: StatusCode, message: String) -> Response {
    (status, Json(ResultEnvelope::<()>::failure(message))).into_response()
}

/// Turns errors of the fallible middleware into failure envelopes.
pub async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        failure_response(StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        tracing::error!(reason = %err, "Middleware failure");
        failure_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

fn envelope_response<T: Serialize>(envelope: ResultEnvelope<T>) -> Response {
    let status = if envelope.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(envelope)).into_response()
}

pub async fn health<C: FabricClient + 'static>(State(state): State<AppState<C>>) -> Json<HealthStatus> {
    let network = state.coordinator.network();
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        channel: network.channel_name.clone(),
        chaincode: network.chaincode_name.clone(),
    })
}

pub async fn query<C: FabricClient + 'static>(
    State(state): State<AppState<C>>,
    request_id: RequestId,
    EnvelopeJson(body): EnvelopeJson<InvokeBody>,
) -> Response {
    tracing::debug!(request_id = %request_id, fcn = %body.fcn, args = ?body.args, "Query requested");
    envelope_response(state.coordinator.query_chaincode(&body.fcn, body.args).await)
}

pub async fn propose<C: FabricClient + 'static>(
    State(state): State<AppState<C>>,
    request_id: RequestId,
    EnvelopeJson(body): EnvelopeJson<InvokeBody>,
) -> Response {
    tracing::debug!(request_id = %request_id, fcn = %body.fcn, "Proposal requested");
    envelope_response(state.coordinator.propose_transaction(&body.fcn, body.args).await)
}

pub async fn propose_transient<C: FabricClient + 'static>(
    State(state): State<AppState<C>>,
    request_id: RequestId,
    EnvelopeJson(body): EnvelopeJson<TransientBody>,
) -> Response {
    // Transient values are private data; only their keys are logged.
    tracing::debug!(
        request_id = %request_id,
        fcn = %body.fcn,
        keys = ?body.transient.keys().collect::<Vec<_>>(),
        "Transient proposal requested"
    );
    envelope_response(
        state
            .coordinator
            .propose_transaction_transient(&body.fcn, body.transient)
            .await,
    )
}

/// Accepts the payload of an accepted proposal unchanged.
pub async fn commit<C: FabricClient + 'static>(
    State(state): State<AppState<C>>,
    request_id: RequestId,
    EnvelopeJson(body): EnvelopeJson<OrderingRequest>,
) -> Response {
    tracing::debug!(request_id = %request_id, tx_id = %body.tx_id, "Commit requested");
    envelope_response(
        state
            .coordinator
            .commit_transaction(body.tx_id, body.proposal_responses, body.proposal)
            .await,
    )
}

pub async fn enrollment_status<C: FabricClient + 'static>(
    State(state): State<AppState<C>>,
    Path(username): Path<String>,
) -> Response {
    envelope_response(state.coordinator.enrollment_status(&username).await)
}
