//! Endorsement acceptance policy and envelope builders.
//!
//! A proposal is accepted only when every endorser returned a well-formed
//! response with status 200. There is no quorum.

use crate::coordinator::envelope::ResultEnvelope;
use crate::coordinator::error::CoordinatorError;
use crate::coordinator::payload::{ProposalOutcome, QueryPayload};
use crate::fabric::{EndorsementResponse, Proposal, TransactionId, ENDORSEMENT_OK};

/// Global outcome of an endorsement round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accepted => "accepted",
            Decision::Rejected => "rejected",
        }
    }
}

/// Classification of a single peer response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Bad,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Good => "good",
            Verdict::Bad => "bad",
        }
    }
}

/// Classify one response independently of the others.
pub fn classify(response: &EndorsementResponse) -> Verdict {
    match response.status() {
        Some(ENDORSEMENT_OK) => Verdict::Good,
        _ => Verdict::Bad,
    }
}

/// Strict AND over all responses. An empty round is accepted.
pub fn evaluate_endorsements(responses: &[EndorsementResponse]) -> Decision {
    if responses.iter().all(|r| classify(r) == Verdict::Good) {
        Decision::Accepted
    } else {
        Decision::Rejected
    }
}

/// Turn raw query payloads into an envelope.
///
/// `None` means the SDK returned nothing; an empty list is still a success.
pub fn build_query_result(payloads: Option<Vec<Vec<u8>>>) -> ResultEnvelope<QueryPayload> {
    match payloads {
        Some(payloads) => ResultEnvelope::success(QueryPayload {
            responses: payloads
                .iter()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .collect(),
        }),
        None => ResultEnvelope::failure(CoordinatorError::QueryEmpty.to_string()),
    }
}

/// Package an endorsement decision; the accepted payload is the commit input.
pub fn build_proposal_result(
    decision: Decision,
    tx_id: TransactionId,
    proposal_responses: Vec<EndorsementResponse>,
    proposal: Proposal,
) -> ResultEnvelope<ProposalOutcome> {
    match decision {
        Decision::Accepted => ResultEnvelope::success(ProposalOutcome {
            tx_id_string: tx_id.transaction_id().to_string(),
            tx_id,
            proposal_responses,
            proposal,
        }),
        Decision::Rejected => {
            ResultEnvelope::failure(CoordinatorError::EndorsementRejected.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fabric::ChaincodeResponse;

    fn response(status: i32) -> EndorsementResponse {
        EndorsementResponse {
            peer: format!("peer-{}", status),
            response: Some(ChaincodeResponse {
                status,
                message: String::new(),
                payload: Vec::new(),
            }),
            endorsement: None,
        }
    }

    fn malformed() -> EndorsementResponse {
        EndorsementResponse {
            peer: "peer-err".to_string(),
            response: None,
            endorsement: None,
        }
    }

    #[test]
    fn test_all_ok_accepted() {
        for n in 0..5 {
            let responses: Vec<_> = (0..n).map(|_| response(200)).collect();
            assert_eq!(evaluate_endorsements(&responses), Decision::Accepted);
        }
    }

    #[test]
    fn test_any_bad_rejected() {
        for status in [0, 201, 400, 500] {
            for position in 0..3 {
                let mut responses = vec![response(200), response(200), response(200)];
                responses[position] = response(status);
                assert_eq!(evaluate_endorsements(&responses), Decision::Rejected);
            }
        }
    }

    #[test]
    fn test_malformed_rejected() {
        let responses = vec![response(200), malformed()];
        assert_eq!(evaluate_endorsements(&responses), Decision::Rejected);
        assert_eq!(classify(&malformed()), Verdict::Bad);
    }

    #[test]
    fn test_classification_per_response() {
        let responses = vec![response(200), response(200), response(500)];
        let verdicts: Vec<_> = responses.iter().map(classify).collect();
        assert_eq!(verdicts, vec![Verdict::Good, Verdict::Good, Verdict::Bad]);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let responses = vec![response(200), malformed(), response(200)];
        assert_eq!(
            evaluate_endorsements(&responses),
            evaluate_endorsements(&responses)
        );
    }

    #[test]
    fn test_rejected_round_envelope() {
        let responses = vec![response(200), response(200), response(500)];
        let decision = evaluate_endorsements(&responses);
        let envelope = build_proposal_result(
            decision,
            TransactionId::new("tx1", "n"),
            responses,
            Proposal::default(),
        );
        assert!(!envelope.is_success());
        assert!(envelope.payload().is_none());
        assert_eq!(envelope.message(), "SendProposal: endorsement failure");
    }

    #[test]
    fn test_accepted_round_envelope() {
        let responses = vec![response(200)];
        let envelope = build_proposal_result(
            Decision::Accepted,
            TransactionId::new("tx1", "n"),
            responses.clone(),
            Proposal::default(),
        );
        let outcome = envelope.into_payload().unwrap();
        assert_eq!(outcome.tx_id_string, "tx1");
        assert_eq!(outcome.proposal_responses, responses);
    }

    #[test]
    fn test_query_result_empty_is_success() {
        let envelope = build_query_result(Some(Vec::new()));
        assert_eq!(envelope, ResultEnvelope::success(QueryPayload { responses: vec![] }));
    }

    #[test]
    fn test_query_result_absent_is_failure() {
        let envelope = build_query_result(None);
        assert!(envelope.payload().is_none());
        assert_eq!(envelope.message(), "Unable to fulfil query");
    }

    #[test]
    fn test_query_result_decodes_in_order() {
        let envelope = build_query_result(Some(vec![b"alice".to_vec(), vec![0xff, b'x']]));
        let payload = envelope.into_payload().unwrap();
        assert_eq!(payload.responses, vec!["alice".to_string(), "\u{fffd}x".to_string()]);
    }
}
