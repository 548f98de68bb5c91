//! Verify command implementation.

use chrono::{Duration, Utc};
use mir_core::{verify_claim, verify_with_policy, ClaimPolicy, PublicKey, VerifyResult};
use serde_json::json;

use crate::output::{format_json, read_json_input};

pub fn run(
    claim_path: Option<String>,
    key: String,
    expected_domain: Option<String>,
    max_age_secs: Option<i64>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let public_key = PublicKey::from_hex(&key).map_err(|e| format!("Invalid public key: {}", e))?;
    let claim = read_json_input(claim_path)?;

    let result = if expected_domain.is_some() || max_age_secs.is_some() {
        let policy = ClaimPolicy {
            expected_domain,
            max_age: max_age_secs.map(Duration::seconds),
            key_expires_at: None,
        };
        verify_with_policy(&claim, &public_key, &policy, Utc::now())
    } else {
        verify_claim(&claim, &public_key)
    };

    let out = match &result {
        VerifyResult::Valid => json!({"valid": true}),
        VerifyResult::Invalid { code, reason } => {
            json!({"valid": false, "code": code, "reason": reason})
        }
    };
    println!("{}", format_json(&out));

    if strict && !result.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
