use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use chaincode_gateway::fabric::OrderingRequest;
use chaincode_gateway::ResultEnvelope;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command line client for the chaincode gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a chaincode function without ordering
    Query {
        fcn: String,
        args: Vec<String>,
    },
    /// Send a transaction proposal for endorsement
    Propose {
        fcn: String,
        args: Vec<String>,
    },
    /// Send a proposal carrying KEY=VALUE pairs in the transient map
    ProposeTransient {
        fcn: String,
        #[arg(value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
    /// Commit an accepted proposal (JSON payload from `propose`, or a full envelope)
    Commit {
        file: PathBuf,
    },
    /// Check whether a user is enrolled
    Status {
        username: String,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Query { fcn, args } => {
            client
                .post(format!("{}/api/v1/query", base))
                .json(&json!({ "fcn": fcn, "args": args }))
                .send()
                .await?
        }
        Commands::Propose { fcn, args } => {
            client
                .post(format!("{}/api/v1/transactions", base))
                .json(&json!({ "fcn": fcn, "args": args }))
                .send()
                .await?
        }
        Commands::ProposeTransient { fcn, pairs } => {
            let transient: BTreeMap<String, String> = pairs.into_iter().collect();
            client
                .post(format!("{}/api/v1/transactions/transient", base))
                .json(&json!({ "fcn": fcn, "transient": transient }))
                .send()
                .await?
        }
        Commands::Commit { file } => {
            let request = read_commit_request(&std::fs::read_to_string(&file)?)?;
            client
                .post(format!("{}/api/v1/transactions/commit", base))
                .json(&request)
                .send()
                .await?
        }
        Commands::Status { username } => {
            client
                .get(format!("{}/api/v1/users/{}/status", base, username))
                .send()
                .await?
        }
    };

    print_response(res).await
}

/// Accept either the bare propose payload or the whole propose envelope.
fn read_commit_request(text: &str) -> Result<OrderingRequest, Box<dyn std::error::Error>> {
    match serde_json::from_str::<ResultEnvelope<OrderingRequest>>(text) {
        Ok(ResultEnvelope::Success(request)) => Ok(request),
        Ok(ResultEnvelope::Failure(message)) => {
            Err(format!("proposal was not accepted: {}", message).into())
        }
        Err(_) => Ok(serde_json::from_str::<OrderingRequest>(text)?),
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<ResultEnvelope<Value>>(&text) {
        Ok(ResultEnvelope::Success(payload)) => {
            println!("{}", serde_json::to_string_pretty(&payload)?)
        }
        Ok(ResultEnvelope::Failure(message)) => {
            eprintln!("Error ({}): {}", status, message);
        }
        Err(_) => {
            eprintln!("Error: gateway returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Value {
        json!({
            "txId": {"id": "7f3c9a", "nonce": "n"},
            "txIdString": "7f3c9a",
            "proposalResponses": [],
            "proposal": {"header": "h"}
        })
    }

    #[test]
    fn test_commit_file_accepts_bare_payload() {
        let request = read_commit_request(&payload().to_string()).unwrap();
        assert_eq!(request.tx_id.transaction_id(), "7f3c9a");
    }

    #[test]
    fn test_commit_file_accepts_envelope() {
        let envelope = json!({"success": true, "payload": payload(), "message": "OK"});
        let request = read_commit_request(&envelope.to_string()).unwrap();
        assert_eq!(request.tx_id.transaction_id(), "7f3c9a");
    }

    #[test]
    fn test_commit_file_rejects_failed_proposal() {
        let envelope = json!({
            "success": false,
            "payload": null,
            "message": "SendProposal: endorsement failure"
        });
        let err = read_commit_request(&envelope.to_string()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "proposal was not accepted: SendProposal: endorsement failure"
        );
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("k=v=w").unwrap(), ("k".to_string(), "v=w".to_string()));
        assert!(parse_pair("novalue").is_err());
    }
}
