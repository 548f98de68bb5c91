//! Sign command implementation.

use chrono::{SecondsFormat, Utc};
use mir_core::{create_claim, ClaimParams, KeyPair};
use serde_json::Value;

use crate::output::format_json;

pub fn run(
    claim_type: String,
    domain: String,
    subject: String,
    timestamp: Option<String>,
    metadata: Option<String>,
    key: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::from_hex(&key).map_err(|e| format!("Invalid private key: {}", e))?;

    let metadata: Option<Value> = match metadata {
        Some(text) => {
            Some(serde_json::from_str(&text).map_err(|e| format!("Invalid metadata JSON: {}", e))?)
        }
        None => None,
    };

    let timestamp =
        timestamp.unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let claim = create_claim(
        ClaimParams {
            claim_type: &claim_type,
            domain: &domain,
            subject: &subject,
            timestamp: &timestamp,
            metadata,
            key_fingerprint: keypair.fingerprint().as_ref(),
        },
        &keypair,
    )
    .map_err(|e| format!("Failed to create claim: {}", e))?;

    println!("{}", format_json(&claim.to_value()?));
    Ok(())
}
